//! 代码 → 展示名称目录
//!
//! 渲染路径和校验路径都会用到,所有查找都必须是全函数:
//! 未知代码降级为带代码的通用名称,不返回错误。

use crate::models::FuelType;
use crate::utils::normalize::strip_non_digits;

/// 燃料类型名称
///
/// 1-6 对应固定枚举,其他代码返回 "Combustível {code}"。
pub fn fuel_type_name(code: i64) -> String {
    match FuelType::from_code(code) {
        Some(fuel) => fuel.name().to_string(),
        None => format!("Combustível {}", code),
    }
}

/// 商品分类名称 (GPC 一级分类代码)
///
/// 接受8位GPC分类代码,允许带分隔符。未知代码返回 "Segmento {code}"。
pub fn segment_name(code: &str) -> String {
    let digits = strip_non_digits(code);
    let name = match digits.as_str() {
        "10000000" => Some("Produtos para Animais de Estimação"),
        "47000000" => Some("Limpeza e Higiene"),
        "50000000" => Some("Alimentos, Bebidas e Tabaco"),
        "51000000" => Some("Saúde"),
        "53000000" => Some("Beleza e Cuidados Pessoais"),
        "63000000" => Some("Calçados"),
        "67000000" => Some("Vestuário"),
        "77000000" => Some("Automotivo"),
        _ => None,
    };

    match name {
        Some(name) => name.to_string(),
        None => format!("Segmento {}", code.trim()),
    }
}

/// 市镇名称 (IBGE 7位代码)
///
/// 目录覆盖阿拉戈斯州主要市镇,未知代码返回 "Município {code}"。
pub fn municipality_name(ibge_code: &str) -> String {
    let digits = strip_non_digits(ibge_code);
    let name = match digits.as_str() {
        "2704302" => Some("Maceió"),
        "2700300" => Some("Arapiraca"),
        "2707701" => Some("Rio Largo"),
        "2706307" => Some("Palmeira dos Índios"),
        "2706703" => Some("Penedo"),
        "2709202" => Some("União dos Palmares"),
        "2708600" => Some("São Miguel dos Campos"),
        "2704708" => Some("Marechal Deodoro"),
        "2702405" => Some("Delmiro Gouveia"),
        "2702306" => Some("Coruripe"),
        "2708006" => Some("Santana do Ipanema"),
        _ => None,
    };

    match name {
        Some(name) => name.to_string(),
        None => format!("Município {}", ibge_code.trim()),
    }
}
