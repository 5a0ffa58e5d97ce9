use rmcp::ServiceExt;
use rmcp::transport::TokioChildProcess;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

fn server_binary() -> PathBuf {
    // Prefer the prebuilt test binary; if missing, build once and use it.
    std::env::var("CARGO_BIN_EXE_wellness_journal_mcp")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let manifest_dir = PathBuf::from(
                std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"),
            );
            let workspace_root = manifest_dir
                .parent()
                .and_then(|p| p.parent())
                .unwrap_or(&manifest_dir)
                .to_path_buf();
            let target_root = std::env::var("CARGO_TARGET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| workspace_root.join("target"));

            let mut path = target_root.join("debug");
            path.push(if cfg!(windows) {
                "wellness_journal_mcp.exe"
            } else {
                "wellness_journal_mcp"
            });
            if !path.exists() {
                let status = std::process::Command::new("cargo")
                    .args([
                        "build",
                        "-p",
                        "wellness_journal_mcp",
                        "--bin",
                        "wellness_journal_mcp",
                        "--quiet",
                    ])
                    .status()
                    .expect("failed to build server binary");
                assert!(
                    status.success(),
                    "failed to build wellness_journal_mcp binary (status {status})"
                );
            }
            path
        })
}

#[tokio::test]
async fn e2e_stdio_lists_tools_and_scores_entry() {
    let mut cmd = Command::new(server_binary());
    cmd.env("WELLNESS_JOURNAL_STORE", "memory");
    cmd.env("RUST_LOG", "debug");

    let (child, mut stderr_opt) = TokioChildProcess::builder(cmd)
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn child");
    let service = match ().serve(child).await {
        Ok(s) => s,
        Err(e) => {
            if let Some(ref mut stderr) = stderr_opt {
                use tokio::io::AsyncReadExt;
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                eprintln!("child stderr:\n{}", buf);
            }
            panic!("serve failed: {e}");
        }
    };

    let tools = service
        .list_tools(Default::default())
        .await
        .expect("list tools");
    let names: Vec<_> = tools
        .tools
        .into_iter()
        .map(|t| t.name.to_string())
        .collect();
    assert!(names.iter().any(|n| n == "score_entry"));
    assert!(names.iter().any(|n| n == "analyze_entry"));
    assert!(names.iter().any(|n| n == "store_entry"));

    let args = serde_json::json!({
        "entry": {
            "date": "2025-07-01",
            "mood": {"mood_score": 8},
            "sleep": {"hours": 8, "quality": 8},
            "exercise": {"type": "run", "duration_minutes": 45, "intensity": "high"},
            "mental_health": {"stress_level": 3, "anxiety_level": 2}
        }
    });
    let res = service
        .call_tool({
            let mut params = rmcp::model::CallToolRequestParams::new("score_entry");
            params.arguments = args.as_object().cloned();
            params
        })
        .await
        .expect("call_tool");
    let v = res.structured_content.expect("structured content");
    let score = v["composite"]["overall_score"].as_u64().expect("score");
    assert!(score <= 100);
    assert_eq!(v["entry"]["date"], "2025-07-01");

    // store then list through the same session
    let stored = service
        .call_tool({
            let mut params = rmcp::model::CallToolRequestParams::new("store_entry");
            params.arguments = args.as_object().cloned();
            params
        })
        .await
        .expect("store_entry");
    let receipt = stored.structured_content.expect("receipt");
    let id = receipt["receipt"]["id"].as_str().expect("id").to_string();
    assert!(id.starts_with("WAL-"));

    let listed = service
        .call_tool({
            let mut params = rmcp::model::CallToolRequestParams::new("list_entries");
            params.arguments = serde_json::json!({}).as_object().cloned();
            params
        })
        .await
        .expect("list_entries");
    let listed = listed.structured_content.expect("list");
    assert_eq!(listed["total"], 1);

    service.cancel().await.expect("cancel");
}
