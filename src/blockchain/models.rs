use crate::models::TransactionRecord;
use serde::Deserialize;
use tracing::warn;

/// Envelope returned by the provider's account/txlist endpoint. `result`
/// is polymorphic: a record array on success, a plain string on rejection.
#[derive(Debug, Deserialize)]
pub struct TxListResponse {
    pub status: String,
    pub message: String,
    pub result: serde_json::Value,
}

/// One transaction as it appears on the wire; every numeric field is a
/// decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub value: String,
    #[serde(rename = "gasPrice", default)]
    pub gas_price: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(rename = "contractAddress", default)]
    pub contract_address: String,
}

/// Convert a wire transaction into our record model. Records with an
/// unparseable value or timestamp are dropped with a warning rather than
/// failing the whole page.
pub fn extract_record(raw: &RawTransaction) -> Option<TransactionRecord> {
    let value = match raw.value.parse::<u128>() {
        Ok(v) => v,
        Err(_) => {
            warn!("Skipping transaction with unparseable value: {:?}", raw.value);
            return None;
        }
    };

    let timestamp = match raw.time_stamp.parse::<i64>() {
        Ok(t) => t,
        Err(_) => {
            warn!(
                "Skipping transaction with unparseable timestamp: {:?}",
                raw.time_stamp
            );
            return None;
        }
    };

    // Some record types omit the gas price; treat it as zero.
    let gas_price = raw.gas_price.parse::<u64>().unwrap_or(0);

    Some(TransactionRecord {
        from: raw.from.clone(),
        to: raw.to.clone(),
        value,
        gas_price,
        timestamp,
        is_contract_creation: raw.to.is_empty() && !raw.contract_address.is_empty(),
    })
}
