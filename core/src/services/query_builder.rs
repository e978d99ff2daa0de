//! 查询构建
//!
//! 宽松输入 → 规范化 → 校验 → 类型化查询。
//! 类型化查询只能从这里得到,拿到 `ProductQuery`/`FuelQuery` 即表示报文合法。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::price_query::{
    EstablishmentInput, EstablishmentSelector, FuelQuery, FuelSearchInput, FuelType, Paging,
    ProductQuery, ProductSearchInput, ProductSelector, QueryEndpoint,
};
use crate::models::tracked_item::{TrackedItem, TrackedItemKind};
use crate::models::ValidationError;
use crate::services::validation_service::{validate_fuel_query, validate_product_query};
use crate::utils::normalize::{normalize_fuel_input, normalize_product_input};

/// 已保存的查询条件无法解析为对应的输入结构
pub const MSG_INVALID_CRITERIA: &str = "Critérios de pesquisa salvos em formato inválido";

/// 校验通过但无法转换 (校验规则与转换规则不一致时才会出现)
pub const MSG_INCONSISTENT_QUERY: &str = "Parâmetros de pesquisa inconsistentes";

/// 已准备好的查询 (商品或燃料)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "endpoint", content = "query", rename_all = "lowercase")]
pub enum PreparedQuery {
    Produto(ProductQuery),
    Combustivel(FuelQuery),
}

impl PreparedQuery {
    pub fn endpoint(&self) -> QueryEndpoint {
        match self {
            Self::Produto(query) => query.endpoint(),
            Self::Combustivel(query) => query.endpoint(),
        }
    }

    pub fn to_request_body(&self) -> Value {
        match self {
            Self::Produto(query) => query.to_request_body(),
            Self::Combustivel(query) => query.to_request_body(),
        }
    }
}

/// 准备商品查询
///
/// 返回的错误包含全部违规信息
pub fn prepare_product_query(input: &ProductSearchInput) -> Result<ProductQuery, ValidationError> {
    let normalized = normalize_product_input(input);
    validate_product_query(&normalized).into_result()?;
    build_product_query(&normalized).ok_or_else(inconsistent)
}

/// 准备燃料查询
pub fn prepare_fuel_query(input: &FuelSearchInput) -> Result<FuelQuery, ValidationError> {
    let normalized = normalize_fuel_input(input);
    validate_fuel_query(&normalized).into_result()?;
    build_fuel_query(&normalized).ok_or_else(inconsistent)
}

/// 按监控项保存的条件准备查询
pub fn prepare_tracked_item(item: &TrackedItem) -> Result<PreparedQuery, ValidationError> {
    match item.kind {
        TrackedItemKind::Produto => {
            let input = ProductSearchInput::from_value(item.criteria.clone())
                .map_err(|e| invalid_criteria(item, e))?;
            prepare_product_query(&input).map(PreparedQuery::Produto)
        }
        TrackedItemKind::Combustivel => {
            let input = FuelSearchInput::from_value(item.criteria.clone())
                .map_err(|e| invalid_criteria(item, e))?;
            prepare_fuel_query(&input).map(PreparedQuery::Combustivel)
        }
    }
}

fn invalid_criteria(item: &TrackedItem, error: serde_json::Error) -> ValidationError {
    tracing::warn!(
        item_id = %item.id,
        error = %error,
        "监控项查询条件无法解析"
    );
    ValidationError::InvalidQuery(vec![MSG_INVALID_CRITERIA.to_string()])
}

fn inconsistent() -> ValidationError {
    tracing::error!("校验通过的查询无法转换为类型化查询");
    ValidationError::InvalidQuery(vec![MSG_INCONSISTENT_QUERY.to_string()])
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn to_u8(value: f64) -> Option<u8> {
    (value.fract() == 0.0 && (0.0..=u8::MAX as f64).contains(&value)).then_some(value as u8)
}

fn to_u32(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value)).then_some(value as u32)
}

fn build_product_query(input: &ProductSearchInput) -> Option<ProductQuery> {
    let produto = input.produto.as_ref()?;

    let product = match (non_blank(&produto.gtin), non_blank(&produto.descricao)) {
        (Some(gtin), None) => ProductSelector::ByGtin { gtin },
        (None, Some(description)) => ProductSelector::ByDescription {
            description,
            ncm: non_blank(&produto.ncm),
            gpc: non_blank(&produto.gpc),
        },
        _ => return None,
    };

    Some(ProductQuery {
        product,
        establishment: build_establishment(input.estabelecimento.as_ref()?)?,
        days: to_u8(input.dias?)?,
        paging: build_paging(input.pagina, input.registros_por_pagina)?,
    })
}

fn build_fuel_query(input: &FuelSearchInput) -> Option<FuelQuery> {
    let code = input.produto.as_ref()?.tipo_combustivel?;
    let fuel_type = FuelType::from_code(to_u8(code)? as i64)?;

    Some(FuelQuery {
        fuel_type,
        establishment: build_establishment(input.estabelecimento.as_ref()?)?,
        days: to_u8(input.dias?)?,
        paging: build_paging(input.pagina, input.registros_por_pagina)?,
    })
}

fn build_establishment(input: &EstablishmentInput) -> Option<EstablishmentSelector> {
    if let Some(cnpj) = input.individual.as_ref().and_then(|i| non_blank(&i.cnpj)) {
        return Some(EstablishmentSelector::ByCnpj { cnpj });
    }

    if let Some(ibge_code) = input.municipio.as_ref().and_then(|m| non_blank(&m.codigo_ibge)) {
        return Some(EstablishmentSelector::ByIbgeCode { ibge_code });
    }

    let geo = input.geolocalizacao.as_ref()?;
    Some(EstablishmentSelector::ByGeolocation {
        lat: geo.latitude?,
        lon: geo.longitude?,
        radius_km: to_u8(geo.raio?)?,
    })
}

fn build_paging(page: Option<f64>, page_size: Option<f64>) -> Option<Paging> {
    let page = match page {
        Some(p) => Some(to_u32(p)?),
        None => None,
    };
    let page_size = match page_size {
        Some(s) => Some(to_u32(s)?),
        None => None,
    };
    Some(Paging { page, page_size })
}
