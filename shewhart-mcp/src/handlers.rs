//! Request dispatch and tool implementations

use crate::protocol::{McpError, McpRequest, McpResponse};
use shewhart::{ChartKind, SampleInput, Shewhart};
use shewhart_core::{Sample, ShewhartError, Value};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "shewhart";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Handle one input line. Returns the serialized response, or `None` for
/// notifications.
pub fn handle_line(engine: &Shewhart, line: &str) -> Option<String> {
    let response = match serde_json::from_str::<JsonValue>(line) {
        Err(e) => {
            warn!(error = %e, "unparseable request");
            McpResponse::from_result(Some(JsonValue::Null), Err(McpError::parse_error(e)))
        }
        Ok(raw) => {
            // echo the id when it is usable, even if the rest of the request is not
            let id = raw
                .get("id")
                .filter(|id| id.is_string() || id.is_number())
                .cloned()
                .unwrap_or(JsonValue::Null);
            match serde_json::from_value::<McpRequest>(raw) {
                Ok(request) => {
                    debug!(method = %request.method, "processing request");
                    let response = handle_request(engine, &request);
                    if request.is_notification() {
                        debug!(method = %request.method, "notification processed");
                        return None;
                    }
                    response
                }
                Err(e) => {
                    warn!(error = %e, "malformed request");
                    McpResponse::from_result(Some(id), Err(McpError::invalid_request(e)))
                }
            }
        }
    };

    match serde_json::to_string(&response) {
        Ok(json) => Some(json),
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            None
        }
    }
}

pub fn handle_request(engine: &Shewhart, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(tools_list()),
        "tools/call" => handle_tool_call(engine, &request.params),
        _ => Err(McpError::method_not_found(&request.method)),
    };

    McpResponse::from_result(request.id.clone(), result)
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    let protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client, protocol, "client connected");

    Ok(json!({
        "protocolVersion": protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Statistical process control: descriptive statistics and Shewhart control limits"
        },
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "instructions": "Use 'analyze' with comma-separated 'data' and/or grouped 'grouped_data' (start-end:frequency;...) to get statistics and X, P, R, C control chart limits."
    }))
}

fn sample_properties() -> JsonValue {
    json!({
        "data": {
            "type": "string",
            "description": "Comma-separated values, e.g. \"10, 12, 11.5\""
        },
        "grouped_data": {
            "type": "string",
            "description": "Grouped frequency data: start-end:frequency entries separated by ';', e.g. \"1-2:3;3-4:2\""
        }
    })
}

fn tools_list() -> JsonValue {
    let mut chart_props = sample_properties();
    chart_props["kind"] = json!({
        "type": "string",
        "description": "Chart kind",
        "enum": ["x", "p", "r", "c"]
    });

    json!({
        "tools": [
            {
                "name": "analyze",
                "description": "Descriptive statistics and all four control charts (X, P, R, C) for a sample.",
                "inputSchema": { "type": "object", "properties": sample_properties() }
            },
            {
                "name": "describe",
                "description": "Count, min, max, mean, median, mode, standard deviation and quartile deviation.",
                "inputSchema": { "type": "object", "properties": sample_properties() }
            },
            {
                "name": "control_chart",
                "description": "Center line, control limits and status for one chart, plus the plotted series.",
                "inputSchema": { "type": "object", "properties": chart_props, "required": ["kind"] }
            },
            {
                "name": "call",
                "description": "Call one registered function (see list_functions) on a list of values, e.g. mean, quartile_dev, ranges, c_chart.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Function name" },
                        "values": {
                            "type": "array",
                            "items": { "type": "number" },
                            "description": "Observations in sequence order"
                        }
                    },
                    "required": ["name", "values"]
                }
            },
            {
                "name": "help",
                "description": "Documentation for a function, or general help.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Function name. Omit for general help." }
                    }
                }
            },
            {
                "name": "list_functions",
                "description": "List available functions, optionally by category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": ["stats", "spc"] }
                    }
                }
            }
        ]
    })
}

fn handle_tool_call(engine: &Shewhart, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
    debug!(tool = name, "tool call");

    match name {
        "analyze" => tool_analyze(engine, &args),
        "describe" => tool_describe(engine, &args),
        "control_chart" => tool_control_chart(engine, &args),
        "call" => tool_call(engine, &args),
        "help" => tool_help(engine, &args),
        "list_functions" => tool_list_functions(engine, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))
            .with_data(json!({ "available": ["analyze", "describe", "control_chart", "call", "help", "list_functions"] }))),
    }
}

/// Read `data` / `grouped_data`; at least one must be present
fn sample_input(args: &JsonValue) -> Result<SampleInput, McpError> {
    let input: SampleInput = serde_json::from_value(args.clone())
        .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {}", e)))?;
    if input.data.is_none() && input.grouped_data.is_none() {
        return Err(McpError::invalid_params("Provide data and/or grouped_data"));
    }
    Ok(input)
}

fn tool_text(text: String, data: JsonValue) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": text }],
        "data": data,
        "isError": false
    })
}

/// Engine failures are tool results, not protocol errors
fn tool_error(err: ShewhartError) -> JsonValue {
    debug!(code = %err.code, "tool failed");
    json!({
        "content": [{ "type": "text", "text": err.to_string() }],
        "data": { "error": err },
        "isError": true
    })
}

fn parsed_sample(args: &JsonValue) -> Result<Result<Sample, ShewhartError>, McpError> {
    let input = sample_input(args)?;
    Ok(input.to_sample().map_err(ShewhartError::from))
}

fn tool_analyze(engine: &Shewhart, args: &JsonValue) -> Result<JsonValue, McpError> {
    let input = sample_input(args)?;
    Ok(match engine.analyze(&input) {
        Ok(report) => tool_text(engine.render(&report), report.to_json()),
        Err(e) => tool_error(e),
    })
}

fn tool_describe(engine: &Shewhart, args: &JsonValue) -> Result<JsonValue, McpError> {
    let result = parsed_sample(args)?.and_then(|sample| engine.describe(&sample));
    Ok(match result {
        Ok(stats) => {
            let renderer = shewhart::Renderer::new(engine.decimals());
            tool_text(renderer.render_statistics(&stats), stats.to_value().to_json())
        }
        Err(e) => tool_error(e),
    })
}

fn tool_control_chart(engine: &Shewhart, args: &JsonValue) -> Result<JsonValue, McpError> {
    let raw_kind = args.get("kind")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing kind argument"))?;
    let kind = ChartKind::parse(raw_kind)
        .ok_or_else(|| McpError::invalid_params(format!("Unknown chart kind: {} (expected x, p, r or c)", raw_kind)))?;

    let sample = match parsed_sample(args)? {
        Ok(s) => s,
        Err(e) => return Ok(tool_error(e)),
    };

    Ok(match engine.chart(&sample, kind) {
        Ok(eval) => {
            let renderer = shewhart::Renderer::new(engine.decimals());
            let text = renderer.render_charts(&[(kind, Ok(eval.clone()))]);
            tool_text(text, eval.to_value().to_json())
        }
        Err(e) => tool_error(e),
    })
}

fn tool_call(engine: &Shewhart, args: &JsonValue) -> Result<JsonValue, McpError> {
    let name = args.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing name argument"))?;
    let values = match args.get("values") {
        Some(v @ JsonValue::Array(_)) => Value::from_json(v),
        Some(_) => return Err(McpError::invalid_params("values must be an array of numbers")),
        None => return Err(McpError::invalid_params("Missing values argument")),
    };

    let result = engine.call(name, &[values]);
    if let Value::Error(e) = result {
        return Ok(tool_error(e));
    }
    let json = result.to_json();
    let text = match &result {
        Value::Object(_) | Value::List(_) => {
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| result.to_string())
        }
        _ => result.to_string(),
    };
    Ok(tool_text(text, json))
}

fn tool_help(engine: &Shewhart, args: &JsonValue) -> Result<JsonValue, McpError> {
    let name = args.get("name").and_then(|v| v.as_str());
    let help = engine.help(name);
    if let Value::Error(e) = help {
        return Ok(tool_error(e));
    }
    Ok(tool_text(format_help(&help), help.to_json()))
}

fn format_help(help: &Value) -> String {
    let mut out = String::new();
    if let Some(name) = help.get("name").as_text() {
        out.push_str(&format!("# {}\n\n", name));
    }
    if let Some(description) = help.get("description").as_text() {
        out.push_str(&format!("{}\n\n", description));
    }
    if let Some(usage) = help.get("usage").as_text() {
        out.push_str(&format!("**Usage:** `{}`\n\n", usage));
    }
    if let Some(min) = help.get("min_values").as_number() {
        out.push_str(&format!("**Minimum values:** {}\n\n", min));
    }
    if let Some(examples) = help.get("examples").as_list() {
        for example in examples.iter().filter_map(Value::as_text) {
            out.push_str(&format!("- `{}`\n", example));
        }
    }
    if out.is_empty() {
        if let Some(groups) = help.get("functions").as_object() {
            let mut categories: Vec<&String> = groups.keys().collect();
            categories.sort();
            for category in categories {
                let names: Vec<&str> = groups[category]
                    .as_list()
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(Value::as_text)
                    .collect();
                out.push_str(&format!("**{}**: {}\n", category, names.join(", ")));
            }
        }
    }
    out
}

fn tool_list_functions(engine: &Shewhart, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = args.get("category").and_then(|v| v.as_str());
    let functions = engine.list_functions(category);
    let names: Vec<&str> = functions
        .as_list()
        .unwrap_or(&[])
        .iter()
        .filter_map(|f| match f {
            Value::Object(obj) => obj.get("name").and_then(Value::as_text),
            _ => None,
        })
        .collect();
    Ok(tool_text(names.join(", "), functions.to_json()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Shewhart {
        Shewhart::with_standard_library()
    }

    fn call(line: &str) -> JsonValue {
        let out = handle_line(&engine(), line).expect("response");
        serde_json::from_str(&out).unwrap()
    }

    fn tool(name: &str, arguments: JsonValue) -> JsonValue {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        });
        call(&request.to_string())
    }

    #[test]
    fn test_initialize() {
        let resp = call(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test"}}}"#);
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(resp["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_notification_gets_no_response() {
        assert!(handle_line(&engine(), r#"{"jsonrpc":"2.0","method":"initialized"}"#).is_none());
    }

    #[test]
    fn test_parse_error() {
        let resp = call("{not json");
        assert_eq!(resp["error"]["code"], -32700);
        assert!(resp["id"].is_null());
    }

    #[test]
    fn test_valid_json_but_not_a_request() {
        let resp = call(r#"{"jsonrpc":"2.0","id":4}"#);
        assert_eq!(resp["error"]["code"], -32600);
        assert_eq!(resp["id"], 4);

        let resp = call("[1, 2, 3]");
        assert_eq!(resp["error"]["code"], -32600);
        assert!(resp["id"].is_null());

        let resp = call(r#"{"jsonrpc":"2.0","id":{"nested":true},"method":7}"#);
        assert_eq!(resp["error"]["code"], -32600);
        assert!(resp["id"].is_null());
    }

    #[test]
    fn test_unknown_method() {
        let resp = call(r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#);
        assert_eq!(resp["error"]["code"], -32601);
    }

    #[test]
    fn test_tools_list_names() {
        let resp = call(r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#);
        let names: Vec<&str> = resp["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["analyze", "describe", "control_chart", "call", "help", "list_functions"]);
    }

    #[test]
    fn test_analyze_tool() {
        let resp = tool("analyze", json!({ "data": "10, 10, 10, 10, 100" }));
        let result = &resp["result"];
        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("| X-Chart | 28.0000 | 136.0000 | -80.0000 | In Control |"));
        assert_eq!(result["data"]["statistics"]["mean"], 28.0);
    }

    #[test]
    fn test_analyze_parse_failure_is_tool_error() {
        let resp = tool("analyze", json!({ "grouped_data": "1-2:3;x" }));
        let result = &resp["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["data"]["error"]["code"], "PARSE_ERROR");
        assert_eq!(result["data"]["error"]["entry"], "x");
    }

    #[test]
    fn test_analyze_requires_input() {
        let resp = tool("analyze", json!({}));
        assert_eq!(resp["error"]["code"], -32602);
        let resp = tool("analyze", json!({ "data": [1, 2, 3] }));
        assert_eq!(resp["error"]["code"], -32602);
    }

    #[test]
    fn test_describe_tool() {
        let resp = tool("describe", json!({ "data": "1, 1, 2, 3" }));
        assert_eq!(resp["result"]["data"]["mode"], "1");
        let resp = tool("describe", json!({ "data": "5" }));
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["data"]["error"]["code"], "INSUFFICIENT_DATA");
    }

    #[test]
    fn test_control_chart_tool() {
        let resp = tool("control_chart", json!({ "kind": "r", "data": "1, 3, 2, 8, 5, 5" }));
        let data = &resp["result"]["data"];
        assert_eq!(data["chart"], "R-Chart");
        assert_eq!(data["plotted"], json!([2.0, 6.0, 0.0]));

        let resp = tool("control_chart", json!({ "kind": "z", "data": "1, 2" }));
        assert_eq!(resp["error"]["code"], -32602);

        let resp = tool("control_chart", json!({ "kind": "p", "data": "4, 5" }));
        assert_eq!(resp["result"]["isError"], true);
    }

    #[test]
    fn test_help_and_list_tools() {
        let resp = tool("help", json!({ "name": "c_chart" }));
        assert!(resp["result"]["content"][0]["text"].as_str().unwrap().starts_with("# c_chart"));

        let resp = tool("help", json!({ "name": "nope" }));
        assert_eq!(resp["result"]["isError"], true);

        let resp = tool("list_functions", json!({ "category": "spc" }));
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(text, "c_chart, p_chart, r_chart, ranges, x_chart");
    }

    #[test]
    fn test_call_tool_runs_registered_functions() {
        let resp = tool("call", json!({ "name": "mean", "values": [1, 2, 3] }));
        assert_eq!(resp["result"]["isError"], false);
        assert_eq!(resp["result"]["data"], 2.0);
        assert_eq!(resp["result"]["content"][0]["text"], "2");

        let resp = tool("call", json!({ "name": "c_chart", "values": [4, 2, 3, 5, 1] }));
        assert_eq!(resp["result"]["data"]["center"], 3.0);
        assert_eq!(resp["result"]["data"]["in_control"], true);

        let resp = tool("call", json!({ "name": "stddev", "values": [4] }));
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["data"]["error"]["code"], "INSUFFICIENT_DATA");
    }

    #[test]
    fn test_call_tool_unknown_function_suggests() {
        let resp = tool("call", json!({ "name": "meen", "values": [1, 2] }));
        assert_eq!(resp["result"]["isError"], true);
        let err = &resp["result"]["data"]["error"];
        assert_eq!(err["code"], "UNDEFINED_FUNC");
        assert!(err["suggestion"].as_str().unwrap().contains("mean"));

        let resp = tool("call", json!({ "name": "mean", "values": "1,2" }));
        assert_eq!(resp["error"]["code"], -32602);
    }

    #[test]
    fn test_oversized_grouped_data_is_tool_error() {
        let resp = tool("describe", json!({ "grouped_data": "1-2:4000000000" }));
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["data"]["error"]["code"], "DOMAIN_ERROR");
    }

    #[test]
    fn test_unknown_tool() {
        let resp = tool("eval", json!({}));
        assert_eq!(resp["error"]["code"], -32602);
    }
}
