use preco_monitor::models::{FuelType, ProductSearchInput};
use preco_monitor::utils::catalog::{fuel_type_name, municipality_name, segment_name};
use preco_monitor::utils::normalize::{
    format_cnpj_display, normalize_product_input, strip_non_digits,
};
use serde_json::json;

// ============================================================================
// strip_non_digits / format_cnpj_display
// ============================================================================

#[test]
fn test_strip_non_digits_只保留数字() {
    assert_eq!(strip_non_digits("59.008.895/0002-34"), "59008895000234");
    assert_eq!(strip_non_digits("27 04 302"), "2704302");
    assert_eq!(strip_non_digits("sem números"), "");
}

#[test]
fn test_strip_non_digits_幂等() {
    for input in ["59.008.895/0002-34", "7891000325858", "a1b2c3", ""] {
        let once = strip_non_digits(input);
        assert_eq!(strip_non_digits(&once), once);
    }
}

#[test]
fn test_format_cnpj_display_格式化() {
    assert_eq!(format_cnpj_display("59008895000234"), "59.008.895/0002-34");
    assert_eq!(format_cnpj_display("12345678901234"), "12.345.678/9012-34");
}

#[test]
fn test_format_cnpj_display_幂等() {
    let once = format_cnpj_display("59008895000234");
    assert_eq!(format_cnpj_display(&once), once);
}

#[test]
fn test_format_cnpj_display_非14位原样返回() {
    for input in ["", "123", "590088950002345", "CNPJ inválido"] {
        assert_eq!(format_cnpj_display(input), input);
    }
}

// ============================================================================
// 目录
// ============================================================================

#[test]
fn test_fuel_type_name_固定枚举() {
    let expected = [
        (1, "Gasolina Comum"),
        (2, "Gasolina Aditivada"),
        (3, "Etanol"),
        (4, "Diesel Comum"),
        (5, "Diesel S10"),
        (6, "GNV"),
    ];
    for (code, name) in expected {
        assert_eq!(fuel_type_name(code), name);
    }

    for fuel in FuelType::ALL {
        assert_eq!(fuel_type_name(fuel.code() as i64), fuel.name());
    }
}

#[test]
fn test_fuel_type_name_未知代码降级() {
    let name = fuel_type_name(99);
    assert!(name.contains("99"));
    assert_eq!(fuel_type_name(0), "Combustível 0");
    assert_eq!(fuel_type_name(-1), "Combustível -1");
}

#[test]
fn test_segment_name() {
    assert_eq!(segment_name("50000000"), "Alimentos, Bebidas e Tabaco");
    assert_eq!(segment_name("12345678"), "Segmento 12345678");
}

#[test]
fn test_municipality_name() {
    assert_eq!(municipality_name("2704302"), "Maceió");
    assert_eq!(municipality_name("27.00300"), "Arapiraca");
    assert_eq!(municipality_name("3550308"), "Município 3550308");
}

// ============================================================================
// 查询输入规范化
// ============================================================================

#[test]
fn test_normalize_product_input_规范化代码与描述() {
    let input = ProductSearchInput::from_value(json!({
        "produto": { "descricao": "  arroz branco  ", "ncm": "1006.30.21", "gpc": "" },
        "estabelecimento": {
            "geolocalizacao": { "latitude": -9.66, "longitude": -35.73, "raio": 5 }
        },
        "dias": 2
    }))
    .unwrap();

    let normalized = normalize_product_input(&input);
    let produto = normalized.produto.as_ref().unwrap();
    assert_eq!(produto.descricao.as_deref(), Some("arroz branco"));
    assert_eq!(produto.ncm.as_deref(), Some("10063021"));
    assert!(produto.gpc.is_none());
    assert_eq!(normalized.estabelecimento, input.estabelecimento);
    assert_eq!(normalized.dias, Some(2.0));
}

#[test]
fn test_normalize_product_input_幂等() {
    let input = ProductSearchInput::from_value(json!({
        "produto": { "gtin": " 789 1000 325858 " },
        "estabelecimento": {
            "individual": { "cnpj": "59.008.895/0002-34" },
            "municipio": { "codigoIBGE": "xx" }
        },
        "dias": "1"
    }))
    .unwrap();

    let once = normalize_product_input(&input);
    assert_eq!(normalize_product_input(&once), once);
}
