//! DOM operations for CDP page session.

use std::path::Path;

use serde_json::json;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{BoxModel, DomNode, RemoteObject};

use super::core::PageSession;

impl PageSession {
    /// Document node id, fetched once per document.
    async fn root_node(&self) -> Result<i64, CdpError> {
        if let Some(root) = *self.root.lock() {
            return Ok(root);
        }
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;
        let root: DomNode = serde_json::from_value(result["root"].clone())?;
        *self.root.lock() = Some(root.node_id);
        Ok(root.node_id)
    }

    /// Forget the cached document node.
    pub(crate) fn invalidate_root(&self) {
        *self.root.lock() = None;
    }

    async fn query_once(&self, method: &str, selector: &str) -> Result<serde_json::Value, CdpError> {
        let root = self.root_node().await?;
        self.call(method, Some(json!({"nodeId": root, "selector": selector})))
            .await
    }

    /// Run a query against the document, refetching the root once if the
    /// cached one went stale.
    async fn query_with_root(&self, method: &str, selector: &str) -> Result<serde_json::Value, CdpError> {
        match self.query_once(method, selector).await {
            Err(e) if e.is_stale_node() => {
                self.invalidate_root();
                self.query_once(method, selector).await
            }
            other => other,
        }
    }

    /// Query selector.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let result = self.query_with_root("DOM.querySelector", selector).await?;
        let node_id = result["nodeId"].as_i64().unwrap_or(0);
        Ok((node_id != 0).then_some(node_id))
    }

    /// Query selector all.
    pub async fn query_selector_all(&self, selector: &str) -> Result<Vec<i64>, CdpError> {
        let result = self.query_with_root("DOM.querySelectorAll", selector).await?;
        Ok(result["nodeIds"]
            .as_array()
            .map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect())
            .unwrap_or_default())
    }

    /// Box model for node; `None` when the node is not rendered.
    pub async fn get_box_model(&self, node_id: i64) -> Result<Option<BoxModel>, CdpError> {
        let result = self
            .call("DOM.getBoxModel", Some(json!({"nodeId": node_id})))
            .await;

        match result {
            Ok(r) => {
                let model: BoxModel = serde_json::from_value(r["model"].clone())?;
                Ok(Some(model))
            }
            Err(e) if e.is_stale_node() => Err(e),
            Err(CdpError::Protocol { code: -32000, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve node to runtime object.
    pub async fn resolve_node(&self, node_id: i64) -> Result<RemoteObject, CdpError> {
        let result = self
            .call("DOM.resolveNode", Some(json!({"nodeId": node_id})))
            .await?;

        let obj: RemoteObject = serde_json::from_value(result["object"].clone())?;
        Ok(obj)
    }

    pub async fn focus(&self, node_id: i64) -> Result<(), CdpError> {
        self.call("DOM.focus", Some(json!({"nodeId": node_id})))
            .await?;
        Ok(())
    }

    pub async fn scroll_into_view(&self, node_id: i64) -> Result<(), CdpError> {
        self.call("DOM.scrollIntoViewIfNeeded", Some(json!({"nodeId": node_id})))
            .await?;
        Ok(())
    }

    /// Set node value (for text inputs and textareas).
    pub async fn set_node_value(&self, node_id: i64, value: &str) -> Result<(), CdpError> {
        self.focus(node_id).await?;
        self.press_key_combo("Control+a").await?;
        self.press_key("Backspace").await?;
        if !value.is_empty() {
            self.type_text(value).await?;
        }
        self.call_on_node(
            node_id,
            "function() { this.dispatchEvent(new Event('change', { bubbles: true })); }",
            Vec::new(),
        )
        .await?;
        Ok(())
    }

    /// Attach a local file to a file input.
    pub async fn set_file_input(&self, node_id: i64, path: &Path) -> Result<(), CdpError> {
        self.call(
            "DOM.setFileInputFiles",
            Some(json!({
                "files": [path.to_string_lossy()],
                "nodeId": node_id,
            })),
        )
        .await?;
        Ok(())
    }

    /// Calculate center point of a quad.
    pub(super) fn quad_center(quad: &[f64]) -> (f64, f64) {
        if quad.len() >= 8 {
            let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
            let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
            (x, y)
        } else {
            (0.0, 0.0)
        }
    }

    /// Click a node: mouse click at its center when rendered, otherwise a
    /// script click.
    pub async fn click_node(&self, node_id: i64) -> Result<(), CdpError> {
        // Hidden nodes cannot scroll into view; the box model check decides.
        let _ = self.scroll_into_view(node_id).await;
        match self.get_box_model(node_id).await? {
            Some(model) if model.width > 0 && model.height > 0 => {
                let (x, y) = Self::quad_center(&model.content);
                self.click(x, y).await
            }
            _ => {
                self.call_on_node(node_id, "function() { this.click(); }", Vec::new())
                    .await?;
                Ok(())
            }
        }
    }
}
