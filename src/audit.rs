use serde_json::Value;

/// Emit an audit event for a cart mutation on the `audit` tracing target.
pub fn log_audit(action: &str, product_id: Option<u64>, metadata: Option<Value>) {
    let metadata = metadata.unwrap_or(Value::Null);
    tracing::info!(
        target: "audit",
        action,
        product_id,
        metadata = %metadata,
        "cart audit"
    );
}
