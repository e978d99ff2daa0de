//! 输入规范化工具
//!
//! 价格API只接受纯数字的 GTIN/CNPJ/IBGE 代码,而用户输入常带有分隔符。
//! 这里的函数都是全函数: 不会失败,重复调用结果不变。

use crate::models::price_query::{
    EstablishmentInput, FuelSearchInput, ProductInput, ProductSearchInput,
};

/// 只保留 0-9 字符
///
/// 例: "12.345.678/9012-34" → "12345678901234"
pub fn strip_non_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 格式化CNPJ用于展示
///
/// 14位数字 → "XX.XXX.XXX/XXXX-XX"。
/// 去除非数字后不是14位时原样返回输入。
pub fn format_cnpj_display(cnpj: &str) -> String {
    let digits = strip_non_digits(cnpj);
    if digits.len() != 14 {
        return cnpj.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

/// 规范化可选的数字代码字段
///
/// 空白视为未填写;不含任何数字的输入原样保留,交给校验器报告位数错误。
fn normalize_code(code: &Option<String>) -> Option<String> {
    let raw = code.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
    let digits = strip_non_digits(raw);
    if digits.is_empty() {
        Some(raw.to_string())
    } else {
        Some(digits)
    }
}

fn normalize_establishment(establishment: &EstablishmentInput) -> EstablishmentInput {
    let mut normalized = establishment.clone();

    if let Some(individual) = normalized.individual.as_mut() {
        individual.cnpj = normalize_code(&individual.cnpj);
    }
    if let Some(municipio) = normalized.municipio.as_mut() {
        municipio.codigo_ibge = normalize_code(&municipio.codigo_ibge);
    }

    normalized
}

/// 规范化商品查询输入
///
/// - GTIN/NCM/GPC/CNPJ/IBGE: 去除非数字字符
/// - 描述: 去除首尾空白,空字符串视为未填写
/// - 数值字段保持不变(范围由校验器负责)
pub fn normalize_product_input(input: &ProductSearchInput) -> ProductSearchInput {
    let produto = input.produto.as_ref().map(|p| ProductInput {
        gtin: normalize_code(&p.gtin),
        descricao: p
            .descricao
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        ncm: normalize_code(&p.ncm),
        gpc: normalize_code(&p.gpc),
    });

    ProductSearchInput {
        produto,
        estabelecimento: input.estabelecimento.as_ref().map(normalize_establishment),
        ..input.clone()
    }
}

/// 规范化燃料查询输入
pub fn normalize_fuel_input(input: &FuelSearchInput) -> FuelSearchInput {
    FuelSearchInput {
        estabelecimento: input.estabelecimento.as_ref().map(normalize_establishment),
        ..input.clone()
    }
}
