//! JSON output formatting

use serde_json::{json, Value};

use crate::engine::executor::{ExecutionResult, ResultData};

pub fn format_json(result: &ExecutionResult) -> String {
    let data: Value = match &result.data {
        ResultData::Users(users) => json!({ "users": users }),
        ResultData::Groups(groups) => json!({ "groups": groups }),
        ResultData::Script(info) => serde_json::to_value(info).unwrap_or(json!(null)),
        ResultData::Scripts(names) => json!({ "scripts": names }),
        ResultData::Message(s) => json!({ "message": s }),
        ResultData::Empty => json!({ "empty": true }),
    };

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}
