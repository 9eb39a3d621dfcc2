//! Deserializes the netlist IR's JSON representation. Reading the bytes
//! (file path resolution, globbing multiple netlist fragments) is the
//! caller's responsibility — this only parses a string already in hand.

use crate::features::ir_normalizer::domain::NetlistDocument;
use crate::shared::models::DkgResult;

pub fn load_netlist_json(content: &str) -> DkgResult<NetlistDocument> {
    let doc: NetlistDocument = serde_json::from_str(content)?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let json = r#"{"modules":{"top":{"netnames":{},"cells":{}}}}"#;
        let doc = load_netlist_json(json).unwrap();
        assert!(doc.modules.contains_key("top"));
    }

    #[test]
    fn rejects_malformed_json() {
        let result = load_netlist_json("{not json");
        assert!(result.is_err());
    }
}
