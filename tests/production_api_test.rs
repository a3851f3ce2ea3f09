// ==========================================
// ProductionApi 集成测试
// ==========================================
// 测试范围:
// 1. 创建/更新: 合计值重算、写后重新读取
// 2. 唯一约束、字段校验、错误响应
// 3. 删除、按月批量删除、分页
// ==========================================


use imac_congelados::api::ApiError;
use test_helpers::{speed_input, TestEnv};

#[test]
fn test_create_record_recomputes_totals() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.production_api;

    let mut input = speed_input("3/2025", "SALGADOS", "Coxinha", &[(1, 100.0, 80.0), (2, 100.0, 100.0)]);
    input.meta_mes = 3000.0;

    let response = api.create_record(input).expect("创建失败");
    let id = response.affected_id.clone().expect("缺少 affectedId");
    assert_eq!(response.data.len(), 1);

    let record = api.get_record(&id).expect("查询失败");
    assert_eq!(record.mes_ano, "03/2025");
    assert_eq!(record.total_programado, 200.0);
    assert_eq!(record.total_realizado, 180.0);
    assert_eq!(record.velocidade, 90.0);
    assert_eq!(record.daily_production.len(), 31);
}

#[test]
fn test_create_duplicate_month_sector_product() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.production_api;

    api.create_record(speed_input("03/2025", "MASSAS", "Nhoque", &[]))
        .expect("创建失败");
    let err = api
        .create_record(speed_input("03/2025", "MASSAS", "Nhoque", &[]))
        .unwrap_err();

    assert!(matches!(err, ApiError::Duplicate(_)));
    assert_eq!(err.to_response().code, "DUPLICATE");
}

#[test]
fn test_create_invalid_input_reports_fields() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.production_api;

    let err = api
        .create_record(speed_input("2025/13", "SALGADOS", "", &[(1, -5.0, 0.0)]))
        .unwrap_err();

    let response = err.to_response();
    assert_eq!(response.code, "VALIDATION_ERROR");
    let details = response.details.expect("缺少 details");
    let fields: Vec<String> = details["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        fields,
        vec!["mesAno", "produto", "dailyProduction[0].programado"]
    );

    // 校验失败不写库
    assert!(api.list_records().unwrap().data.is_empty());
}

#[test]
fn test_update_record_keeps_created_at() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.production_api;

    let created = api
        .create_record(speed_input("03/2025", "SALGADOS", "Kibe", &[(1, 50.0, 50.0)]))
        .expect("创建失败");
    let id = created.affected_id.unwrap();
    let before = api.get_record(&id).unwrap();

    let response = api
        .update_record(&id, speed_input("03/2025", "SALGADOS", "Kibe", &[(1, 50.0, 25.0)]))
        .expect("更新失败");
    assert_eq!(response.affected_id.as_deref(), Some(id.as_str()));

    let after = api.get_record(&id).unwrap();
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.total_realizado, 25.0);
    assert_eq!(after.velocidade, 50.0);

    let err = api
        .update_record("missing", speed_input("03/2025", "SALGADOS", "Kibe", &[]))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_delete_record_and_month_batch() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.production_api;

    for produto in ["Coxinha", "Esfiha", "Kibe"] {
        api.create_record(speed_input("03/2025", "SALGADOS", produto, &[]))
            .expect("创建失败");
    }
    let other = api
        .create_record(speed_input("04/2025", "SALGADOS", "Coxinha", &[]))
        .expect("创建失败")
        .affected_id
        .unwrap();

    let response = api.delete_month_batch("03/2025").expect("批量删除失败");
    assert_eq!(response.outcome.requested, 3);
    assert_eq!(response.outcome.succeeded, 3);
    assert_eq!(response.outcome.failed, 0);
    assert_eq!(response.data.len(), 1);
    assert!(response.message.contains('3'));

    let response = api.delete_record(&other).expect("删除失败");
    assert!(response.data.is_empty());
    assert!(matches!(api.delete_record(&other), Err(ApiError::NotFound(_))));
    assert!(matches!(
        api.delete_month_batch("março"),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_list_records_page() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let api = &env.state.production_api;

    for (mes, produto) in [("01/2025", "A"), ("02/2025", "B"), ("03/2025", "C")] {
        api.create_record(speed_input(mes, "MASSAS", produto, &[]))
            .expect("创建失败");
    }

    let page = api.list_records_page(1, 2).expect("分页失败");
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].mes_ano, "03/2025");

    let page = api.list_records_page(2, 2).expect("分页失败");
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].produto, "A");
}
