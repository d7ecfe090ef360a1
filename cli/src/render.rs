//! Terminal output for turns, dispatch results and extractions

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use toolgate_application::RunTurnOutput;
use toolgate_domain::tool::{
    entities::ToolCall,
    extraction::{Extraction, NoCallReason},
    value_objects::ToolResult,
};
use toolgate_domain::turn::render_tool_response;

pub fn print_turn(output: &RunTurnOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }

    if let Some(call) = &output.call {
        eprintln!("{} {}", "→".cyan(), describe_call(call).dimmed());
    }

    match &output.result {
        Some(result) if result.is_success() => println!("{}", output.response.green()),
        Some(_) => println!("{}", output.response.red()),
        None => println!("{}", output.response),
    }
    Ok(())
}

pub fn print_result(result: &ToolResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let text = render_tool_response(result);
    if result.is_success() {
        println!("{}", text.green());
    } else {
        println!("{}", text.red());
    }
    if let Some(ms) = result.metadata.duration_ms {
        eprintln!("{}", format!("({} ms)", ms).dimmed());
    }
    Ok(())
}

pub fn print_extraction(
    extraction: &Extraction,
    result: Option<&ToolResult>,
    json: bool,
) -> Result<()> {
    if json {
        let (call, reason): (Option<&ToolCall>, Option<&NoCallReason>) = match extraction {
            Extraction::Call(call) => (Some(call), None),
            Extraction::NoCall(reason) => (None, Some(reason)),
        };
        let value = json!({
            "call": call,
            "no_call_reason": reason,
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match extraction {
        Extraction::Call(call) => {
            println!("{} {}", "Tool call:".bold(), describe_call(call));
            if let Some(reasoning) = &call.reasoning {
                println!("{} {}", "Thought:".bold(), reasoning);
            }
            if let Some(provenance) = &call.provenance {
                println!(
                    "{} bytes {}..{}",
                    "Span:".bold(),
                    provenance.start,
                    provenance.end
                );
            }
        }
        Extraction::NoCall(reason) => {
            println!("{} {}", "No tool call:".yellow().bold(), reason);
        }
    }

    if let Some(result) = result {
        print_result(result, false)?;
    }
    Ok(())
}

fn describe_call(call: &ToolCall) -> String {
    let args = serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".to_string());
    format!("{} {}", call.tool_name, args)
}
