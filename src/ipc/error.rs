use serde_json::json;

/// Machine-readable `error.code` values the UI switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadJson,
    BadParams,
    NotFound,
    NotImplemented,
    DatasetLoadFailed,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadJson => "bad_json",
            ErrorCode::BadParams => "bad_params",
            ErrorCode::NotFound => "not_found",
            ErrorCode::NotImplemented => "not_implemented",
            ErrorCode::DatasetLoadFailed => "dataset_load_failed",
        }
    }
}

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({ "id": id, "ok": true, "result": result })
}

fn error_object(
    code: ErrorCode,
    message: String,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({ "code": code.as_str(), "message": message });
    if let Some(d) = details {
        error["details"] = d;
    }
    error
}

pub fn err(
    id: &str,
    code: ErrorCode,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    json!({
        "id": id,
        "ok": false,
        "error": error_object(code, message.into(), details),
    })
}

/// Reply for a line that did not parse, so there is no id to echo.
pub fn bad_json(message: impl Into<String>) -> serde_json::Value {
    json!({
        "ok": false,
        "error": error_object(ErrorCode::BadJson, message.into(), None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_omitted_unless_given() {
        let plain = err("7", ErrorCode::NotFound, "module not found", None);
        assert_eq!(plain["id"], "7");
        assert_eq!(plain["error"]["code"], "not_found");
        assert!(plain["error"].get("details").is_none());

        let detailed = err(
            "8",
            ErrorCode::BadParams,
            "unknown kind: exam",
            Some(json!({ "allowed": ["quiz"] })),
        );
        assert_eq!(detailed["error"]["details"]["allowed"][0], "quiz");
    }

    #[test]
    fn bad_json_has_no_id() {
        let v = bad_json("expected value at line 1 column 1");
        assert!(v.get("id").is_none());
        assert_eq!(v["ok"], false);
        assert_eq!(v["error"]["code"], "bad_json");
    }
}
