//! 查询参数校验
//!
//! 价格API对请求体非常严格,任何不合规的报文都会被拒绝。
//! 这里在发出网络请求前检查全部结构规则,收集所有违规信息
//! (而不是遇到第一个就返回),调用方可以一次性提示所有问题。
//!
//! 校验器只检查去除非数字字符后的位数,不修改输入。
//! 空白字符串视为未填写。

use serde::{Deserialize, Serialize};

use crate::models::price_query::{EstablishmentInput, FuelSearchInput, ProductSearchInput};
use crate::models::ValidationError;
use crate::utils::normalize::strip_non_digits;

pub const MSG_PRODUCT_REQUIRED: &str = "Informe GTIN ou Descrição do produto";
pub const MSG_PRODUCT_EXCLUSIVE: &str = "Informe apenas GTIN ou Descrição, não ambos";
pub const MSG_NCM_GPC_REQUIRES_DESCRIPTION: &str =
    "NCM e GPC só podem ser informados junto com a Descrição do produto";
pub const MSG_GTIN_LENGTH: &str = "GTIN deve ter entre 8 e 14 dígitos";
pub const MSG_ESTABLISHMENT_EXCLUSIVE: &str = "Informe exatamente um tipo de estabelecimento: \
     CNPJ, código IBGE do município ou geolocalização (latitude, longitude e raio)";
pub const MSG_CNPJ_LENGTH: &str = "CNPJ deve ter 14 dígitos";
pub const MSG_IBGE_LENGTH: &str = "Código IBGE deve ter 7 dígitos";
pub const MSG_LATITUDE_RANGE: &str = "Latitude deve estar entre -90 e 90";
pub const MSG_LONGITUDE_RANGE: &str = "Longitude deve estar entre -180 e 180";
pub const MSG_RADIUS_RANGE: &str = "Raio deve ser um número inteiro entre 1 e 15 km";
pub const MSG_DAYS_RANGE: &str = "O número de dias deve ser um inteiro entre 1 e 10";
pub const MSG_FUEL_TYPE_RANGE: &str = "Informe o tipo de combustível (código entre 1 e 6)";
pub const MSG_PAGE_POSITIVE: &str = "A página deve ser um número inteiro positivo";
pub const MSG_PAGE_SIZE_POSITIVE: &str = "Registros por página deve ser um número inteiro positivo";

pub const GTIN_MIN_DIGITS: usize = 8;
pub const GTIN_MAX_DIGITS: usize = 14;
pub const CNPJ_DIGITS: usize = 14;
pub const IBGE_DIGITS: usize = 7;
pub const MIN_DAYS: f64 = 1.0;
pub const MAX_DAYS: f64 = 10.0;
pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 15.0;
pub const MIN_FUEL_TYPE: f64 = 1.0;
pub const MAX_FUEL_TYPE: f64 = 6.0;

/// 校验结果
///
/// 违规信息按规则顺序排列;为空表示校验通过
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// 是否存在包含指定片段的违规信息
    pub fn contains(&self, fragment: &str) -> bool {
        self.violations.iter().any(|v| v.contains(fragment))
    }

    /// 转换为 Result,供 `?` 传播
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::InvalidQuery(self.violations))
        }
    }

    fn push(&mut self, message: &str) {
        self.violations.push(message.to_string());
    }
}

impl From<ValidationReport> for Vec<String> {
    fn from(report: ValidationReport) -> Self {
        report.violations
    }
}

/// 非空白字符串
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// 闭区间检查,NaN/无穷大一律不通过
fn in_range(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && value >= min && value <= max
}

fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// 校验商品查询
///
/// 规则顺序:
/// 1. GTIN 与 描述 二选一
/// 2. NCM/GPC 只能与描述同时出现
/// 3. GTIN 8-14位数字
/// 4. 商户选择条件恰好一个 (CNPJ / IBGE / 完整地理位置)
/// 5. CNPJ 14位数字
/// 6. IBGE 7位数字
/// 7. 纬度 [-90,90]、经度 [-180,180]、半径 [1,15] 整数,各自独立报告
/// 8. 天数必填且在 [1,10]
/// 9. 分页参数 (可选) 为正整数
pub fn validate_product_query(input: &ProductSearchInput) -> ValidationReport {
    let mut report = ValidationReport::default();
    let produto = input.produto.as_ref();

    let gtin = produto.and_then(|p| present(&p.gtin));
    let descricao = produto.and_then(|p| present(&p.descricao));
    let has_ncm_or_gpc = produto.is_some_and(|p| present(&p.ncm).is_some() || present(&p.gpc).is_some());

    match (gtin, descricao) {
        (None, None) => report.push(MSG_PRODUCT_REQUIRED),
        (Some(_), Some(_)) => report.push(MSG_PRODUCT_EXCLUSIVE),
        _ => {}
    }

    if has_ncm_or_gpc && descricao.is_none() {
        report.push(MSG_NCM_GPC_REQUIRES_DESCRIPTION);
    }

    if let Some(gtin) = gtin {
        let digits = strip_non_digits(gtin).len();
        if !(GTIN_MIN_DIGITS..=GTIN_MAX_DIGITS).contains(&digits) {
            report.push(MSG_GTIN_LENGTH);
        }
    }

    check_establishment(input.estabelecimento.as_ref(), &mut report);
    check_days(input.dias, &mut report);
    check_paging(input.pagina, input.registros_por_pagina, &mut report);

    tracing::debug!(violations = report.len(), "Product query validated");
    report
}

/// 校验燃料查询
///
/// 燃料类型代码必填且在 [1,6],其余规则与商品查询的 4-9 相同
pub fn validate_fuel_query(input: &FuelSearchInput) -> ValidationReport {
    let mut report = ValidationReport::default();

    let fuel_type = input.produto.as_ref().and_then(|p| p.tipo_combustivel);
    let fuel_type_ok = fuel_type
        .is_some_and(|code| is_integer(code) && in_range(code, MIN_FUEL_TYPE, MAX_FUEL_TYPE));
    if !fuel_type_ok {
        report.push(MSG_FUEL_TYPE_RANGE);
    }

    check_establishment(input.estabelecimento.as_ref(), &mut report);
    check_days(input.dias, &mut report);
    check_paging(input.pagina, input.registros_por_pagina, &mut report);

    tracing::debug!(violations = report.len(), "Fuel query validated");
    report
}

/// 商户选择条件 (商品与燃料共用)
fn check_establishment(establishment: Option<&EstablishmentInput>, report: &mut ValidationReport) {
    let cnpj = establishment
        .and_then(|e| e.individual.as_ref())
        .and_then(|i| present(&i.cnpj));
    let ibge_code = establishment
        .and_then(|e| e.municipio.as_ref())
        .and_then(|m| present(&m.codigo_ibge));
    let geolocation = establishment
        .and_then(|e| e.geolocalizacao.as_ref())
        .and_then(|g| match (g.latitude, g.longitude, g.raio) {
            (Some(lat), Some(lon), Some(radius)) => Some((lat, lon, radius)),
            _ => None,
        });

    let selected = [cnpj.is_some(), ibge_code.is_some(), geolocation.is_some()]
        .iter()
        .filter(|selected| **selected)
        .count();
    if selected != 1 {
        report.push(MSG_ESTABLISHMENT_EXCLUSIVE);
    }

    if let Some(cnpj) = cnpj {
        if strip_non_digits(cnpj).len() != CNPJ_DIGITS {
            report.push(MSG_CNPJ_LENGTH);
        }
    }

    if let Some(ibge_code) = ibge_code {
        if strip_non_digits(ibge_code).len() != IBGE_DIGITS {
            report.push(MSG_IBGE_LENGTH);
        }
    }

    if let Some((lat, lon, radius)) = geolocation {
        if !in_range(lat, -90.0, 90.0) {
            report.push(MSG_LATITUDE_RANGE);
        }
        if !in_range(lon, -180.0, 180.0) {
            report.push(MSG_LONGITUDE_RANGE);
        }
        if !(is_integer(radius) && in_range(radius, MIN_RADIUS_KM, MAX_RADIUS_KM)) {
            report.push(MSG_RADIUS_RANGE);
        }
    }
}

fn check_days(days: Option<f64>, report: &mut ValidationReport) {
    let ok = days.is_some_and(|d| is_integer(d) && in_range(d, MIN_DAYS, MAX_DAYS));
    if !ok {
        report.push(MSG_DAYS_RANGE);
    }
}

fn check_paging(page: Option<f64>, page_size: Option<f64>, report: &mut ValidationReport) {
    let positive_integer = |v: f64| is_integer(v) && v >= 1.0 && v <= u32::MAX as f64;

    if page.is_some_and(|p| !positive_integer(p)) {
        report.push(MSG_PAGE_POSITIVE);
    }
    if page_size.is_some_and(|s| !positive_integer(s)) {
        report.push(MSG_PAGE_SIZE_POSITIVE);
    }
}
