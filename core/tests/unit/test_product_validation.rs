use preco_monitor::models::{
    EstablishmentInput, GeolocationInput, IndividualInput, MunicipalityInput, ProductInput,
    ProductSearchInput,
};
use preco_monitor::services::validation_service::{
    validate_product_query, MSG_CNPJ_LENGTH, MSG_DAYS_RANGE, MSG_ESTABLISHMENT_EXCLUSIVE,
    MSG_GTIN_LENGTH, MSG_IBGE_LENGTH, MSG_LATITUDE_RANGE, MSG_LONGITUDE_RANGE,
    MSG_NCM_GPC_REQUIRES_DESCRIPTION, MSG_PRODUCT_EXCLUSIVE, MSG_PRODUCT_REQUIRED,
    MSG_RADIUS_RANGE,
};
use serde_json::json;

fn base_input() -> ProductSearchInput {
    ProductSearchInput::from_value(json!({
        "produto": { "gtin": "7891000325858" },
        "estabelecimento": { "individual": { "cnpj": "59008895000234" } },
        "dias": 1
    }))
    .unwrap()
}

fn with_establishment(establishment: EstablishmentInput) -> ProductSearchInput {
    ProductSearchInput {
        estabelecimento: Some(establishment),
        ..base_input()
    }
}

fn cnpj(value: &str) -> Option<IndividualInput> {
    Some(IndividualInput {
        cnpj: Some(value.to_string()),
    })
}

fn ibge(value: &str) -> Option<MunicipalityInput> {
    Some(MunicipalityInput {
        codigo_ibge: Some(value.to_string()),
    })
}

fn geo(lat: f64, lon: f64, radius: f64) -> Option<GeolocationInput> {
    Some(GeolocationInput {
        latitude: Some(lat),
        longitude: Some(lon),
        raio: Some(radius),
    })
}

// ============================================================================
// 端到端场景
// ============================================================================

#[test]
fn test_端到端_合法查询无违规() {
    let report = validate_product_query(&base_input());
    assert!(report.is_valid(), "{:?}", report);
}

#[test]
fn test_端到端_天数改为11只多出天数错误() {
    let mut input = base_input();
    input.dias = Some(11.0);

    let report = validate_product_query(&input);
    assert_eq!(report.violations(), &[MSG_DAYS_RANGE.to_string()]);
    assert!(report.contains("dias"));
}

#[test]
fn test_天数边界() {
    for days in [1.0, 10.0] {
        let mut input = base_input();
        input.dias = Some(days);
        assert!(validate_product_query(&input).is_valid(), "dias = {}", days);
    }

    for days in [0.0, 11.0, 2.5, -1.0] {
        let mut input = base_input();
        input.dias = Some(days);
        assert!(
            validate_product_query(&input).contains(MSG_DAYS_RANGE),
            "dias = {}",
            days
        );
    }

    let mut input = base_input();
    input.dias = None;
    assert!(validate_product_query(&input).contains(MSG_DAYS_RANGE));
}

// ============================================================================
// 商品选择条件
// ============================================================================

#[test]
fn test_gtin与描述同时存在() {
    let mut input = base_input();
    input.produto = Some(ProductInput {
        gtin: Some("7891000325858".to_string()),
        descricao: Some("LEITE".to_string()),
        ..Default::default()
    });

    let report = validate_product_query(&input);
    assert!(!report.is_valid());
    assert!(report.contains(MSG_PRODUCT_EXCLUSIVE));
    assert!(report.contains("apenas GTIN ou Descrição"));
}

#[test]
fn test_gtin与描述都缺失() {
    let mut input = base_input();
    input.produto = None;

    let report = validate_product_query(&input);
    assert_eq!(report.violations(), &[MSG_PRODUCT_REQUIRED.to_string()]);

    input.produto = Some(ProductInput::default());
    assert!(!validate_product_query(&input).is_valid());
}

#[test]
fn test_ncm_gpc必须配合描述() {
    let mut input = base_input();
    input.produto = Some(ProductInput {
        gtin: Some("7891000325858".to_string()),
        gpc: Some("10000000".to_string()),
        ..Default::default()
    });
    assert_eq!(
        validate_product_query(&input).violations(),
        &[MSG_NCM_GPC_REQUIRES_DESCRIPTION.to_string()]
    );

    input.produto = Some(ProductInput {
        descricao: Some("ARROZ".to_string()),
        ncm: Some("10063021".to_string()),
        gpc: Some("10000000".to_string()),
        ..Default::default()
    });
    assert!(validate_product_query(&input).is_valid());
}

#[test]
fn test_gtin位数_忽略分隔符() {
    let mut input = base_input();
    input.produto = Some(ProductInput {
        gtin: Some("789-1000-325858".to_string()),
        ..Default::default()
    });
    assert!(validate_product_query(&input).is_valid());

    input.produto = Some(ProductInput {
        gtin: Some("7891-0003".to_string()),
        ..Default::default()
    });
    assert!(!validate_product_query(&input).contains(MSG_GTIN_LENGTH));

    input.produto = Some(ProductInput {
        gtin: Some("789.100".to_string()),
        ..Default::default()
    });
    assert!(validate_product_query(&input).contains(MSG_GTIN_LENGTH));
}

// ============================================================================
// 商户选择条件
// ============================================================================

#[test]
fn test_cnpj_格式化与纯数字等价() {
    for value in ["59008895000234", "59.008.895/0002-34", " 59 008 895 0002 34 "] {
        let input = with_establishment(EstablishmentInput {
            individual: cnpj(value),
            ..Default::default()
        });
        let report = validate_product_query(&input);
        assert!(!report.contains(MSG_CNPJ_LENGTH), "cnpj = {}", value);
    }
}

#[test]
fn test_cnpj_位数错误() {
    for value in ["123", "5900889500023", "590088950002345", "sem cnpj"] {
        let input = with_establishment(EstablishmentInput {
            individual: cnpj(value),
            ..Default::default()
        });
        let report = validate_product_query(&input);
        assert!(report.contains(MSG_CNPJ_LENGTH), "cnpj = {}", value);
        assert!(!report.contains(MSG_ESTABLISHMENT_EXCLUSIVE));
    }
}

#[test]
fn test_ibge_位数() {
    let input = with_establishment(EstablishmentInput {
        municipio: ibge("2704302"),
        ..Default::default()
    });
    assert!(validate_product_query(&input).is_valid());

    let input = with_establishment(EstablishmentInput {
        municipio: ibge("270430"),
        ..Default::default()
    });
    assert_eq!(
        validate_product_query(&input).violations(),
        &[MSG_IBGE_LENGTH.to_string()]
    );
}

#[test]
fn test_商户选择条件计数() {
    let none = EstablishmentInput::default();
    let two = EstablishmentInput {
        individual: cnpj("59008895000234"),
        municipio: ibge("2704302"),
        geolocalizacao: None,
    };
    let three = EstablishmentInput {
        individual: cnpj("59008895000234"),
        municipio: ibge("2704302"),
        geolocalizacao: geo(-9.66, -35.73, 5.0),
    };

    for establishment in [none, two, three] {
        let report = validate_product_query(&with_establishment(establishment));
        assert!(report.contains(MSG_ESTABLISHMENT_EXCLUSIVE));
    }

    let only_geo = EstablishmentInput {
        geolocalizacao: geo(-9.66, -35.73, 5.0),
        ..Default::default()
    };
    assert!(validate_product_query(&with_establishment(only_geo)).is_valid());
}

#[test]
fn test_不完整地理位置不算选择条件() {
    let partial = EstablishmentInput {
        geolocalizacao: Some(GeolocationInput {
            latitude: Some(-9.66),
            longitude: Some(-35.73),
            raio: None,
        }),
        ..Default::default()
    };
    let report = validate_product_query(&with_establishment(partial));
    assert_eq!(report.violations(), &[MSG_ESTABLISHMENT_EXCLUSIVE.to_string()]);

    let partial_with_cnpj = EstablishmentInput {
        individual: cnpj("59008895000234"),
        geolocalizacao: Some(GeolocationInput {
            latitude: Some(-9.66),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert!(validate_product_query(&with_establishment(partial_with_cnpj)).is_valid());
}

#[test]
fn test_半径边界() {
    for radius in [1.0, 15.0] {
        let input = with_establishment(EstablishmentInput {
            geolocalizacao: geo(-9.66, -35.73, radius),
            ..Default::default()
        });
        assert!(
            !validate_product_query(&input).contains(MSG_RADIUS_RANGE),
            "raio = {}",
            radius
        );
    }

    for radius in [0.0, 16.0, -3.0, 2.5, 100.0] {
        let input = with_establishment(EstablishmentInput {
            geolocalizacao: geo(-9.66, -35.73, radius),
            ..Default::default()
        });
        assert!(
            validate_product_query(&input).contains(MSG_RADIUS_RANGE),
            "raio = {}",
            radius
        );
    }
}

#[test]
fn test_经纬度边界() {
    let input = with_establishment(EstablishmentInput {
        geolocalizacao: geo(90.0, -180.0, 5.0),
        ..Default::default()
    });
    assert!(validate_product_query(&input).is_valid());

    let input = with_establishment(EstablishmentInput {
        geolocalizacao: geo(90.5, 0.0, 5.0),
        ..Default::default()
    });
    assert_eq!(
        validate_product_query(&input).violations(),
        &[MSG_LATITUDE_RANGE.to_string()]
    );

    let input = with_establishment(EstablishmentInput {
        geolocalizacao: geo(0.0, 180.5, 5.0),
        ..Default::default()
    });
    assert_eq!(
        validate_product_query(&input).violations(),
        &[MSG_LONGITUDE_RANGE.to_string()]
    );
}

// ============================================================================
// 宽松输入
// ============================================================================

#[test]
fn test_宽松输入_字符串数字与非法数字() {
    let input = ProductSearchInput::from_value(json!({
        "produto": { "gtin": 7891000325858u64 },
        "estabelecimento": {
            "geolocalizacao": { "latitude": "-9,66", "longitude": "-35.73", "raio": "cinco" }
        },
        "dias": "3"
    }))
    .unwrap();

    let report = validate_product_query(&input);
    assert_eq!(report.violations(), &[MSG_RADIUS_RANGE.to_string()]);
}

#[test]
fn test_任意形状输入都不会失败() {
    let input = ProductSearchInput::from_value(json!({
        "produto": { "gtin": null, "descricao": ["x"], "ncm": {} },
        "estabelecimento": { "individual": { "cnpj": true } },
        "dias": { "valor": 1 },
        "pagina": "primeira"
    }))
    .unwrap();

    let report = validate_product_query(&input);
    assert!(report.contains(MSG_PRODUCT_REQUIRED));
    assert!(report.contains(MSG_ESTABLISHMENT_EXCLUSIVE));
    assert!(report.contains(MSG_DAYS_RANGE));
}
