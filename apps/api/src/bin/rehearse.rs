//! Terminal rehearsal client.
//!
//! Drives one full interview session in the terminal: questions are paced by
//! the silent narrator, answers are typed instead of spoken (each entered
//! line lands as a final recognition segment), and a silence microphone
//! stands in for real audio so recordings still carry correct durations.
//!
//! Keys: Enter starts and stops recording, `s` skips the question, `q` ends
//! the session early. With `--server URL` questions and scoring go through
//! the HTTP service; without it everything is scored locally.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::models::question::{Question, QuestionSet};
use api::questions::sample_questions;
use api::session::capture::{CaptureError, RecognitionEngine, RecognitionEvent};
use api::session::recorder::{MicSource, MicStream, RecorderError};
use api::session::{
    HttpScoringClient, InterviewSession, LocalScoringClient, Phase, ScoringClient, SessionUpdate,
    SilentNarrator,
};

const LANGUAGE: &str = "ko-KR";

/// Recognition engine fed from the keyboard. Every line typed while an
/// attempt is open arrives as one final segment.
#[derive(Default)]
struct TypedSpeechEngine {
    slot: Mutex<Option<mpsc::Sender<RecognitionEvent>>>,
}

impl TypedSpeechEngine {
    async fn push_final(&self, text: &str) {
        if let Some(tx) = self.slot.lock().await.as_ref() {
            let _ = tx.try_send(RecognitionEvent::Final(text.to_string()));
        }
    }
}

#[async_trait]
impl RecognitionEngine for TypedSpeechEngine {
    fn is_supported(&self) -> bool {
        true
    }

    async fn open(&self, _language: &str) -> Result<mpsc::Receiver<RecognitionEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel(16);
        *self.slot.lock().await = Some(tx);
        Ok(rx)
    }
}

/// Microphone stand-in emitting 100 ms frames of silence at 16 kHz, so the
/// recorder produces WAV blobs with correct durations on any machine.
struct SilenceMic;

#[async_trait]
impl MicSource for SilenceMic {
    async fn acquire(&self) -> Result<MicStream, RecorderError> {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(100));
            loop {
                ticker.tick().await;
                if tx.send(vec![0i16; 1600]).await.is_err() {
                    break;
                }
            }
        });
        Ok(MicStream {
            frames: rx,
            sample_rate: 16_000,
        })
    }
}

async fn fetch_questions(server: &str) -> Result<Vec<Question>> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!(
            "{}/api/interview/generate-questions",
            server.trim_end_matches('/')
        ))
        .json(&serde_json::json!({
            "jobKeywords": ["백엔드", "Rust", "데이터베이스"],
            "resumeText": "3년차 백엔드 개발자로 Rust 기반 API 서버를 개발했습니다.",
        }))
        .send()
        .await?
        .error_for_status()?;
    let set: QuestionSet = response.json().await?;
    Ok(set.questions)
}

fn print_banner(count: usize) {
    println!("모의 면접을 시작합니다. 총 {count}개의 질문이 준비되어 있습니다.");
    println!("[Enter] 녹음 시작/종료  [s] 건너뛰기  [q] 세션 종료");
}

fn render(update: &SessionUpdate, questions: &[Question], recording: &mut bool) {
    match update {
        SessionUpdate::PhaseChanged { index, phase } => match phase {
            Phase::Narrating => {
                if let Some(question) = questions.get(*index) {
                    println!("\n질문 {}. {}", index + 1, question.text);
                }
            }
            Phase::AwaitingStart => {
                *recording = false;
                println!("[Enter]를 누르면 녹음이 시작됩니다.");
            }
            Phase::Recording => {
                *recording = true;
                println!("녹음 중입니다. 답변을 입력하고 [Enter]로 마치세요.");
            }
            Phase::Submitting => {
                *recording = false;
                println!("답변을 채점하는 중입니다...");
            }
            Phase::Complete => println!("\n면접이 끝났습니다."),
        },
        SessionUpdate::CountdownTick { remaining_secs } => {
            print!("\r남은 시간: {remaining_secs:>3}초  ");
            let _ = std::io::stdout().flush();
        }
        SessionUpdate::TranscriptChanged { transcript } => println!("▷ {transcript}"),
        SessionUpdate::Notice { message } => println!("! {message}"),
        SessionUpdate::QuestionResolved { result } => {
            println!("피드백: {}", result.content_feedback);
            if let Some(metrics) = &result.delivery_metrics {
                match metrics.spm {
                    Some(spm) => println!("말하기 속도: 분당 {spm}음절 | {}", metrics.speed_advice),
                    None => println!("말하기 속도: {}", metrics.speed_advice),
                }
                println!(
                    "추임새: {}회 | {}",
                    metrics.filler_count, metrics.filler_advice
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut server: Option<String> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server" => {
                server = Some(args.next().context("--server requires a URL")?);
            }
            other => anyhow::bail!("unknown argument: {other} (usage: rehearse [--server URL])"),
        }
    }

    let questions = match &server {
        Some(url) => match fetch_questions(url).await {
            Ok(questions) => questions,
            Err(e) => {
                warn!("Question service unavailable ({e}); using the sample set");
                sample_questions()
            }
        },
        None => sample_questions(),
    };

    let scoring: Arc<dyn ScoringClient> = match &server {
        Some(url) => Arc::new(HttpScoringClient::new(url)),
        None => Arc::new(LocalScoringClient),
    };

    let engine = Arc::new(TypedSpeechEngine::default());
    let (session, controls, mut updates) = InterviewSession::new(
        questions.clone(),
        Arc::new(SilentNarrator::default()),
        Arc::clone(&engine) as Arc<dyn RecognitionEngine>,
        Arc::new(SilenceMic),
        scoring,
        LANGUAGE,
    );
    let session = tokio::spawn(session.run());

    print_banner(questions.len());

    let (input_tx, mut input) = mpsc::channel::<String>(8);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut recording = false;
    loop {
        tokio::select! {
            maybe = updates.recv() => match maybe {
                Some(update) => render(&update, &questions, &mut recording),
                None => break,
            },
            Some(line) = input.recv() => {
                let trimmed = line.trim();
                match trimmed {
                    "" if recording => controls.stop_recording().await,
                    "" => controls.start_recording().await,
                    "s" => controls.skip().await,
                    "q" => controls.shutdown().await,
                    _ if recording => engine.push_final(trimmed).await,
                    _ => {}
                }
            },
        }
    }

    let report = session.await.context("session task failed")?;
    println!("\n세션 리포트:");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
