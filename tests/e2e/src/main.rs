mod filesystem_validator;

use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode};
use std::path::{Path, PathBuf};
use test_utils::*;

/// Larger than a typical `--part-size` used in CI so the body spans several parts
const LARGE_BODY_LEN: usize = 3 * 1024 * 1024 + 17;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("e2e_tests=debug,info")
        .init();

    let server_url = std::env::var("SERVER_URL")
        .unwrap_or_else(|_| "http://localhost:8123".to_string())
        .trim_end_matches('/')
        .to_string();
    let upload_dir = std::env::var("UPLOAD_DIR")
        .map(PathBuf::from)
        .context("UPLOAD_DIR must point at the directory the server saves to")?;
    let secret = std::env::var("UPLOAD_SECRET")
        .ok()
        .filter(|s| !s.is_empty());

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(Path::parent)
        .context("e2e crate is not inside the workspace")?
        .to_path_buf();
    let client_binary = std::env::var("CLIENT_BINARY")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            workspace_root
                .join("target")
                .join("release")
                .join("upload-client")
        });
    let test_data_dir = manifest_dir.join("test_data");
    std::fs::create_dir_all(&test_data_dir)?;

    // Unique per run so leftovers from earlier runs do not shift suffixes
    let prefix = format!("e2e-{}-", std::process::id());

    println!("Server URL: {}", server_url);
    println!("Upload dir: {:?}", upload_dir);
    println!("Secret configured: {}", secret.is_some());
    println!("Client binary: {:?}", client_binary);

    wait_for_server(&server_url).await?;

    let result = run_upload_tests(
        &server_url,
        &upload_dir,
        secret.as_deref(),
        &prefix,
        &client_binary,
        &test_data_dir,
    )
    .await;

    // Always cleanup, even on error
    if let Err(e) = cleanup(&upload_dir, &prefix, &test_data_dir) {
        eprintln!("Warning: Failed to cleanup test data: {}", e);
    }

    result?;
    println!("\n✅ All E2E tests passed!");
    Ok(())
}

async fn run_upload_tests(
    server_url: &str,
    upload_dir: &Path,
    secret: Option<&str>,
    prefix: &str,
    client_binary: &Path,
    test_data_dir: &Path,
) -> Result<()> {
    let client = Client::new();
    let report = format!("{}report.txt", prefix);

    println!("\n🚫 Testing GET is rejected...");
    let url = upload_url(server_url, &report, secret);
    let status = client.get(&url).send().await?.status();
    expect_status("GET", status, StatusCode::NOT_FOUND)?;
    filesystem_validator::validate_absent(upload_dir, prefix)?;

    if secret.is_some() {
        println!("\n🔒 Testing uploads without the secret are rejected...");
        let url = upload_url(server_url, &report, None);
        let status = send(&client, Method::PUT, &url, b"hello world").await?;
        expect_status("PUT without secret", status, StatusCode::NOT_FOUND)?;
        let url = format!("{}?secret=wrong", url);
        let status = send(&client, Method::POST, &url, b"hello world").await?;
        expect_status("POST with wrong parameter", status, StatusCode::NOT_FOUND)?;
        filesystem_validator::validate_absent(upload_dir, prefix)?;
    }

    println!("\n📤 Testing repeated uploads of the same name...");
    let url = upload_url(server_url, &report, secret);
    for (i, method) in [Method::PUT, Method::PUT, Method::POST].into_iter().enumerate() {
        let status = send(&client, method, &url, b"hello world").await?;
        expect_status(&format!("upload #{}", i + 1), status, StatusCode::CREATED)?;
    }
    filesystem_validator::validate_saved_file(upload_dir, &report, b"hello world")?;
    filesystem_validator::validate_saved_file(upload_dir, &format!("{}_1", report), b"hello world")?;
    filesystem_validator::validate_saved_file(upload_dir, &format!("{}_2", report), b"hello world")?;

    if let Some(secret) = secret {
        println!("\n🔑 Testing secret with an explicit blank value...");
        let name = format!("{}blank.txt", prefix);
        let url = format!("{}/{}?{}=", server_url, name, secret);
        let status = send(&client, Method::PUT, &url, b"blank").await?;
        expect_status("PUT with blank secret value", status, StatusCode::CREATED)?;
        filesystem_validator::validate_saved_file(upload_dir, &name, b"blank")?;
    }

    println!("\n📦 Testing a multi-part body...");
    let large: Vec<u8> = (0..LARGE_BODY_LEN).map(|i| (i % 253) as u8).collect();
    let name = format!("{}large.bin", prefix);
    let url = upload_url(server_url, &name, secret);
    let status = send(&client, Method::PUT, &url, &large).await?;
    expect_status("large PUT", status, StatusCode::CREATED)?;
    filesystem_validator::validate_saved_file(upload_dir, &name, &large)?;

    println!("\n🛡️  Testing path traversal is refused...");
    let url = upload_url(server_url, "..%2F..%2Fescape.txt", secret);
    let status = send(&client, Method::PUT, &url, b"evil").await?;
    expect_status("traversal PUT", status, StatusCode::NOT_FOUND)?;

    if client_binary.exists() {
        println!("\n🧰 Testing the upload client...");
        let source = format!("{}source.txt", prefix);
        create_test_file(test_data_dir, &source, b"sent by upload-client\n")?;
        let name = format!("{}client.txt", prefix);
        upload_with_client(
            client_binary,
            &test_data_dir.join(&source),
            server_url,
            &name,
            secret,
        )?;
        filesystem_validator::validate_saved_file(upload_dir, &name, b"sent by upload-client\n")?;
    } else {
        println!(
            "\n⚠️  Skipping client test, binary not found: {:?}",
            client_binary
        );
    }

    Ok(())
}

fn cleanup(upload_dir: &Path, prefix: &str, test_data_dir: &Path) -> Result<()> {
    let keep_data = std::env::var("KEEP_TEST_DATA").unwrap_or_else(|_| "false".to_string());
    if keep_data == "true" {
        println!(
            "\n⚠️  Keeping test data (KEEP_TEST_DATA=true): {:?}",
            upload_dir
        );
        return Ok(());
    }

    println!("\n🧹 Cleaning up uploaded files with prefix {}", prefix);
    for name in filesystem_validator::list_with_prefix(upload_dir, prefix)? {
        let path = upload_dir.join(&name);
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove uploaded file: {:?}", path))?;
    }
    if test_data_dir.exists() {
        std::fs::remove_dir_all(test_data_dir).with_context(|| {
            format!("Failed to remove test data directory: {:?}", test_data_dir)
        })?;
    }
    println!("✅ Test data cleaned up");
    Ok(())
}
