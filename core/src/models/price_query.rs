//! 价格查询参数模型
//!
//! 两层表示:
//! - 宽松输入 (`ProductSearchInput`/`FuelSearchInput`): 与价格API报文同形,
//!   所有字段可选,来自表单或已保存的搜索条件
//! - 类型化查询 (`ProductQuery`/`FuelQuery`): 判别联合,只能通过
//!   `services::query_builder` 在校验通过后构建

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::utils::lenient;

/// 价格API端点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryEndpoint {
    /// 商品价格
    Produto,
    /// 燃料价格
    Combustivel,
}

impl QueryEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Produto => "produto",
            Self::Combustivel => "combustivel",
        }
    }

    /// 相对于API根路径的查询路径
    pub fn path(&self) -> String {
        format!("{}/pesquisa", self.as_str())
    }
}

// ============================================================
// 宽松输入
// ============================================================

/// 商品查询输入 (未校验)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSearchInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produto: Option<ProductInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estabelecimento: Option<EstablishmentInput>,

    /// 回溯天数
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub dias: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub pagina: Option<f64>,

    #[serde(
        rename = "registrosPorPagina",
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub registros_por_pagina: Option<f64>,
}

/// 商品选择条件: GTIN 或 描述(+NCM/GPC)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub gtin: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub descricao: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub ncm: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub gpc: Option<String>,
}

/// 燃料查询输入 (未校验)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelSearchInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produto: Option<FuelInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estabelecimento: Option<EstablishmentInput>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub dias: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub pagina: Option<f64>,

    #[serde(
        rename = "registrosPorPagina",
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub registros_por_pagina: Option<f64>,
}

/// 燃料选择条件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelInput {
    #[serde(
        rename = "tipoCombustivel",
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub tipo_combustivel: Option<f64>,
}

/// 商户选择条件: CNPJ / IBGE市镇代码 / 地理位置 三选一
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual: Option<IndividualInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipio: Option<MunicipalityInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocalizacao: Option<GeolocationInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualInput {
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cnpj: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityInput {
    #[serde(
        rename = "codigoIBGE",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub codigo_ibge: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeolocationInput {
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,

    /// 搜索半径 (公里)
    #[serde(
        default,
        deserialize_with = "lenient::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub raio: Option<f64>,
}

impl ProductSearchInput {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl FuelSearchInput {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

// ============================================================
// 类型化查询
// ============================================================

/// 燃料类型 (价格API固定枚举)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    GasolinaComum,
    GasolinaAditivada,
    Etanol,
    DieselComum,
    DieselS10,
    Gnv,
}

impl FuelType {
    pub const ALL: [FuelType; 6] = [
        Self::GasolinaComum,
        Self::GasolinaAditivada,
        Self::Etanol,
        Self::DieselComum,
        Self::DieselS10,
        Self::Gnv,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::GasolinaComum),
            2 => Some(Self::GasolinaAditivada),
            3 => Some(Self::Etanol),
            4 => Some(Self::DieselComum),
            5 => Some(Self::DieselS10),
            6 => Some(Self::Gnv),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::GasolinaComum => 1,
            Self::GasolinaAditivada => 2,
            Self::Etanol => 3,
            Self::DieselComum => 4,
            Self::DieselS10 => 5,
            Self::Gnv => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GasolinaComum => "Gasolina Comum",
            Self::GasolinaAditivada => "Gasolina Aditivada",
            Self::Etanol => "Etanol",
            Self::DieselComum => "Diesel Comum",
            Self::DieselS10 => "Diesel S10",
            Self::Gnv => "GNV",
        }
    }
}

/// 商品选择器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductSelector {
    ByGtin {
        gtin: String,
    },
    ByDescription {
        description: String,
        ncm: Option<String>,
        gpc: Option<String>,
    },
}

/// 商户选择器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstablishmentSelector {
    ByCnpj { cnpj: String },
    ByIbgeCode { ibge_code: String },
    ByGeolocation { lat: f64, lon: f64, radius_km: u8 },
}

/// 分页参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// 已校验的商品查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub product: ProductSelector,
    pub establishment: EstablishmentSelector,
    /// 回溯天数 (1-10)
    pub days: u8,
    pub paging: Paging,
}

/// 已校验的燃料查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelQuery {
    pub fuel_type: FuelType,
    pub establishment: EstablishmentSelector,
    pub days: u8,
    pub paging: Paging,
}

impl EstablishmentSelector {
    fn to_wire(&self) -> Value {
        match self {
            Self::ByCnpj { cnpj } => json!({ "individual": { "cnpj": cnpj } }),
            Self::ByIbgeCode { ibge_code } => json!({ "municipio": { "codigoIBGE": ibge_code } }),
            Self::ByGeolocation {
                lat,
                lon,
                radius_km,
            } => json!({
                "geolocalizacao": {
                    "latitude": lat,
                    "longitude": lon,
                    "raio": radius_km
                }
            }),
        }
    }
}

impl Paging {
    fn write_to(&self, body: &mut Map<String, Value>) {
        if let Some(page) = self.page {
            body.insert("pagina".to_string(), json!(page));
        }
        if let Some(page_size) = self.page_size {
            body.insert("registrosPorPagina".to_string(), json!(page_size));
        }
    }
}

impl ProductQuery {
    pub fn endpoint(&self) -> QueryEndpoint {
        QueryEndpoint::Produto
    }

    /// 价格API请求体
    pub fn to_request_body(&self) -> Value {
        let produto = match &self.product {
            ProductSelector::ByGtin { gtin } => json!({ "gtin": gtin }),
            ProductSelector::ByDescription {
                description,
                ncm,
                gpc,
            } => {
                let mut produto = Map::new();
                produto.insert("descricao".to_string(), json!(description));
                if let Some(ncm) = ncm {
                    produto.insert("ncm".to_string(), json!(ncm));
                }
                if let Some(gpc) = gpc {
                    produto.insert("gpc".to_string(), json!(gpc));
                }
                Value::Object(produto)
            }
        };

        let mut body = Map::new();
        body.insert("produto".to_string(), produto);
        body.insert("estabelecimento".to_string(), self.establishment.to_wire());
        body.insert("dias".to_string(), json!(self.days));
        self.paging.write_to(&mut body);
        Value::Object(body)
    }
}

impl FuelQuery {
    pub fn endpoint(&self) -> QueryEndpoint {
        QueryEndpoint::Combustivel
    }

    /// 价格API请求体
    pub fn to_request_body(&self) -> Value {
        let mut body = Map::new();
        body.insert(
            "produto".to_string(),
            json!({ "tipoCombustivel": self.fuel_type.code() }),
        );
        body.insert("estabelecimento".to_string(), self.establishment.to_wire());
        body.insert("dias".to_string(), json!(self.days));
        self.paging.write_to(&mut body);
        Value::Object(body)
    }
}
