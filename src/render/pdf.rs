use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::PdfRenderer;
use crate::error::{AppError, Result};

/// Page layout handed to the PDF engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOptions {
    pub page_size: &'static str,
    pub margin_top_mm: u32,
    pub margin_bottom_mm: u32,
    pub margin_left_mm: u32,
    pub margin_right_mm: u32,
    pub no_outline: bool,
    pub disable_smart_shrinking: bool,
}

impl PdfOptions {
    /// Full-bleed A4 ticket layout. Every ticket uses this.
    pub fn ticket() -> Self {
        Self {
            page_size: "A4",
            margin_top_mm: 0,
            margin_bottom_mm: 0,
            margin_left_mm: 0,
            margin_right_mm: 0,
            no_outline: true,
            disable_smart_shrinking: true,
        }
    }

    /// wkhtmltopdf flags, reading HTML from stdin and writing PDF to stdout.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--page-size".to_string(),
            self.page_size.to_string(),
            "--margin-top".to_string(),
            self.margin_top_mm.to_string(),
            "--margin-bottom".to_string(),
            self.margin_bottom_mm.to_string(),
            "--margin-left".to_string(),
            self.margin_left_mm.to_string(),
            "--margin-right".to_string(),
            self.margin_right_mm.to_string(),
        ];
        if self.no_outline {
            args.push("--no-outline".to_string());
        }
        if self.disable_smart_shrinking {
            args.push("--disable-smart-shrinking".to_string());
        }
        args.push("-".to_string());
        args.push("-".to_string());
        args
    }
}

/// Shells out to the wkhtmltopdf binary.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    binary: String,
}

impl WkhtmltopdfRenderer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.binary)
            .args(options.to_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::Pdf(format!("Failed to start {}: {}", self.binary, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AppError::Pdf("wkhtmltopdf stdin unavailable".to_string()))?;

        // Feed stdin while stdout is drained, otherwise large pages deadlock on the pipe.
        let input = html.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AppError::Pdf(format!("wkhtmltopdf did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Pdf(format!(
                "wkhtmltopdf exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(AppError::Pdf(format!("Failed to write HTML to wkhtmltopdf: {}", e)))
            }
            Err(e) => return Err(AppError::Pdf(format!("HTML writer task failed: {}", e))),
        }

        if output.stdout.is_empty() {
            return Err(AppError::Pdf("wkhtmltopdf produced no output".to_string()));
        }

        tracing::debug!(bytes = output.stdout.len(), "PDF rendered");
        Ok(output.stdout)
    }
}
