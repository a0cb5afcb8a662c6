use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, Command};
use tracing::{debug, warn};

use super::{EngineConfig, EngineError, EngineRequest, EngineResult, SynthesisEngine};

/// Default argument template, one flag per generation parameter.
pub const DEFAULT_COMMAND_ARGS: &[&str] = &[
    "--text",
    "{text}",
    "--voice",
    "{voice}",
    "--output",
    "{output}",
    "--temperature",
    "{temperature}",
    "--top_p",
    "{top_p}",
    "--repetition_penalty",
    "{repetition_penalty}",
];

/// Bytes of stderr kept for the error detail.
const STDERR_TAIL_BYTES: usize = 2048;

/// Runs one engine process per request.
///
/// Arguments are passed directly to the program, never through a shell, so
/// the prompt needs no quoting. The child is killed if the invocation future
/// is dropped.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandEngine {
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let program = config
            .command
            .as_ref()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                EngineError::InvalidConfiguration(
                    "command engine requires a program (ENGINE_COMMAND or engine.command)"
                        .to_string(),
                )
            })?
            .to_string();

        let args = if config.args.is_empty() {
            DEFAULT_COMMAND_ARGS.iter().map(|a| a.to_string()).collect()
        } else {
            config.args.clone()
        };

        Ok(Self {
            program,
            args,
            timeout: config.timeout(),
        })
    }

    /// Substitute request values into the argument template.
    pub fn render_args(&self, request: &EngineRequest) -> Vec<String> {
        let output = request.output_path.to_string_lossy();
        let temperature = request.temperature.to_string();
        let top_p = request.top_p.to_string();
        let repetition_penalty = request.repetition_penalty.to_string();

        self.args
            .iter()
            .map(|arg| {
                // {text} goes last so placeholders inside the prompt stay literal
                arg.replace("{voice}", &request.voice)
                    .replace("{output}", &output)
                    .replace("{temperature}", &temperature)
                    .replace("{top_p}", &top_p)
                    .replace("{repetition_penalty}", &repetition_penalty)
                    .replace("{text}", &request.prompt)
            })
            .collect()
    }
}

#[async_trait]
impl SynthesisEngine for CommandEngine {
    async fn synthesize(&self, request: &EngineRequest) -> EngineResult<()> {
        let args = self.render_args(request);
        debug!(
            program = %self.program,
            voice = %request.voice,
            output = %request.output_path.display(),
            "Starting synthesis process"
        );

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = child.stderr.take();
        let run = async {
            let (exit, tail) = tokio::join!(child.wait(), read_stderr_tail(stderr));
            exit.map(|exit| (exit, tail))
        };

        let (exit, tail) = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| EngineError::Timeout(limit))??,
            None => run.await?,
        };

        if exit.success() {
            return Ok(());
        }

        let status = match exit.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        let detail = stderr_tail(&tail);
        warn!(program = %self.program, %status, "Synthesis process failed");

        Err(EngineError::Failed { status, detail })
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

/// Drain the child's stderr, keeping at most the last `STDERR_TAIL_BYTES`.
async fn read_stderr_tail(stderr: Option<ChildStderr>) -> Vec<u8> {
    let Some(mut stderr) = stderr else {
        return Vec::new();
    };

    let mut tail = Vec::with_capacity(STDERR_TAIL_BYTES);
    let mut chunk = [0u8; 1024];
    loop {
        match stderr.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                tail.extend_from_slice(&chunk[..n]);
                if tail.len() > STDERR_TAIL_BYTES {
                    let excess = tail.len() - STDERR_TAIL_BYTES;
                    tail.drain(..excess);
                }
            }
            Err(e) => {
                debug!(error = %e, "Stopped reading engine stderr");
                break;
            }
        }
    }
    tail
}

fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    let tail = String::from_utf8_lossy(&stderr[start..]);
    let tail = tail.trim();
    if tail.is_empty() {
        "no error output".to_string()
    } else {
        tail.to_string()
    }
}
