//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

fn exception_text(result: &Value) -> Option<String> {
    result.get("exceptionDetails").map(|exception| {
        exception["exception"]["description"]
            .as_str()
            .or_else(|| exception["text"].as_str())
            .unwrap_or("Unknown error")
            .to_string()
    })
}

impl PageSession {
    /// Evaluate JavaScript expression.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(text) = exception_text(&result) {
            return Err(CdpError::JavaScript(text));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Call function on remote object.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, CdpError> {
        let params = json!({
            "objectId": object_id,
            "functionDeclaration": function,
            "arguments": args.into_iter().map(|v| json!({"value": v})).collect::<Vec<_>>(),
            "returnByValue": true,
            "awaitPromise": true,
        });

        let result = self.call("Runtime.callFunctionOn", Some(params)).await?;

        if let Some(text) = exception_text(&result) {
            return Err(CdpError::JavaScript(text));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Call `function` with the node as `this`.
    pub async fn call_on_node(
        &self,
        node_id: i64,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, CdpError> {
        let object = self.resolve_node(node_id).await?;
        let object_id = object
            .object_id
            .ok_or_else(|| CdpError::InvalidResponse(format!("Node {} has no object id", node_id)))?;
        self.call_function_on(&object_id, function, args).await
    }
}
