//! 价格记录模型
//!
//! `PriceQueryPage` 对应价格API的分页响应报文;
//! `PriceRecord` 是下游(存储、历史、比价)实际消费的扁平记录。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::lenient;
use crate::utils::time_utils::parse_sale_time;

/// 价格API分页响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceQueryPage {
    pub total_registros: u64,
    pub total_paginas: u32,
    pub pagina: u32,
    pub registros_por_pagina: u32,
    pub registros_pagina: u32,
    pub conteudo: Vec<PriceEntry>,
}

/// 单条销售记录 (原始报文)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceEntry {
    pub produto: ProductInfo,
    pub estabelecimento: EstablishmentInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInfo {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub codigo: Option<String>,
    pub descricao: Option<String>,
    pub descricao_sefaz: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub gtin: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub ncm: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub gpc: Option<String>,
    pub unidade_medida: Option<String>,
    pub venda: SaleInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleInfo {
    pub data_venda: Option<String>,
    #[serde(deserialize_with = "lenient::opt_number")]
    pub valor_declarado: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_number")]
    pub valor_venda: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstablishmentInfo {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub cnpj: Option<String>,
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub telefone: Option<String>,
    pub endereco: Option<AddressInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInfo {
    pub nome_logradouro: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub numero_imovel: Option<String>,
    pub bairro: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub cep: Option<String>,
    #[serde(rename = "codigoIBGE", deserialize_with = "lenient::opt_string")]
    pub codigo_ibge: Option<String>,
    pub municipio: Option<String>,
    #[serde(deserialize_with = "lenient::opt_number")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_number")]
    pub longitude: Option<f64>,
}

/// 价格记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// 销售价格
    pub sale_price: f64,
    /// 申报价格 (可选)
    pub declared_price: Option<f64>,
    pub product_description: Option<String>,
    pub gtin: Option<String>,
    pub establishment_cnpj: String,
    /// 商户名 (nome fantasia)
    pub trade_name: Option<String>,
    /// 法人名 (razão social)
    pub legal_name: String,
    pub municipality: Option<String>,
    pub sold_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
}

impl PriceRecord {
    /// 从原始报文构建
    ///
    /// 销售价格缺失或不是有限数值、销售时间无法解析时返回 None;
    /// 申报价格不是有限数值时视为缺失
    pub fn from_entry(entry: &PriceEntry, fetched_at: DateTime<Utc>) -> Option<Self> {
        let sale = &entry.produto.venda;
        let sale_price = sale.valor_venda.filter(|price| price.is_finite())?;
        let sold_at = sale.data_venda.as_deref().and_then(parse_sale_time)?;
        let establishment = &entry.estabelecimento;

        Some(Self {
            sale_price,
            declared_price: sale.valor_declarado.filter(|price| price.is_finite()),
            product_description: entry
                .produto
                .descricao
                .clone()
                .or_else(|| entry.produto.descricao_sefaz.clone()),
            gtin: entry.produto.gtin.clone(),
            establishment_cnpj: establishment.cnpj.clone().unwrap_or_default(),
            trade_name: establishment.nome_fantasia.clone(),
            legal_name: establishment.razao_social.clone().unwrap_or_default(),
            municipality: establishment
                .endereco
                .as_ref()
                .and_then(|address| address.municipio.clone()),
            sold_at,
            fetched_at,
        })
    }

    /// 展示用商户名: 优先商户名,其次法人名
    pub fn display_name(&self) -> &str {
        self.trade_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.legal_name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl PriceQueryPage {
    /// 转换为价格记录,跳过无法使用的条目
    ///
    /// 返回 (记录, 跳过条数)
    pub fn into_records(self, fetched_at: DateTime<Utc>) -> (Vec<PriceRecord>, usize) {
        let total = self.conteudo.len();
        let records: Vec<PriceRecord> = self
            .conteudo
            .iter()
            .filter_map(|entry| PriceRecord::from_entry(entry, fetched_at))
            .collect();
        let skipped = total - records.len();
        if skipped > 0 {
            tracing::warn!(skipped, total, "部分价格记录缺少售价或销售时间无法解析,已跳过");
        }
        (records, skipped)
    }
}

/// 价格汇总
///
/// 一次同步结果的最低/最高/平均价,以及最低价商户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub lowest_price_cnpj: String,
    pub lowest_price_name: String,
    pub data_points: usize,
}

impl PriceSummary {
    /// 无记录时返回 None
    pub fn from_records(records: &[PriceRecord]) -> Option<Self> {
        let lowest = records
            .iter()
            .filter(|r| r.sale_price.is_finite())
            .min_by(|a, b| a.sale_price.total_cmp(&b.sale_price))?;

        let prices: Vec<f64> = records
            .iter()
            .map(|r| r.sale_price)
            .filter(|p| p.is_finite())
            .collect();
        let max_price = prices.iter().copied().fold(f64::MIN, f64::max);
        let avg_price = prices.iter().sum::<f64>() / prices.len() as f64;

        Some(Self {
            min_price: lowest.sale_price,
            max_price,
            avg_price,
            lowest_price_cnpj: lowest.establishment_cnpj.clone(),
            lowest_price_name: lowest.display_name().to_string(),
            data_points: prices.len(),
        })
    }
}
