use anyhow::Result;
use chrono::{Local, TimeZone};
use mlg_core::{
    record::{BufferedRecorder, NullRecorder, Record, RecordValue},
    snapshot::load_snapshot,
    Config, MlgError, RunConfig, RunContext, RunState,
};
use log::Level;
use serde_json::json;
use std::{fs, path::Path};
use tempdir::TempDir;

fn new_year() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn buffered(_: &Path) -> Result<BufferedRecorder, MlgError> {
    Ok(BufferedRecorder::new())
}

fn entries(dir: &Path) -> Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|e| Ok(e?.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

#[test]
fn test_run_with_args() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let log_root = tmp.path().join("logs");
    let args = Config::new(json!({"model": {"lr": 0.01}}));
    let config = RunConfig::default()
        .log_root(&log_root)
        .record_param(["model.lr"]);

    let run = RunContext::new_at(&config, Some(&args), &new_year(), buffered)?;
    let root = log_root.join("2024-01-01_00-00-00&model-lr=0.01");

    assert_eq!(run.state(), RunState::Ready);
    assert_eq!(run.exp_dir(), root);
    assert_eq!(run.ckpt_dir(), root.join("checkpoint"));
    assert_eq!(run.result_dir(), root.join("result"));
    assert_eq!(run.record_params(), &vec![("model-lr".to_string(), json!(0.01))]);
    assert_eq!(
        entries(&root)?,
        vec!["checkpoint", "log.log", "parameter.json", "result"]
    );
    assert!(entries(run.ckpt_dir())?.is_empty());
    assert!(entries(run.result_dir())?.is_empty());
    assert_eq!(
        fs::read_to_string(root.join("parameter.json"))?,
        "{\n    \"model\": {\n        \"lr\": 0.01\n    }\n}\n"
    );
    assert_eq!(load_snapshot(&root)?, args);
    Ok(())
}

#[test]
fn test_run_without_args() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let config = RunConfig::default().log_root(tmp.path());
    let run = RunContext::new(&config, None, |_| Ok(NullRecorder::default()))?;

    let name = run.identity().name().to_string();
    assert_eq!(name, run.identity().timestamp());
    assert!(!name.contains('&'));
    assert_eq!(run.exp_dir(), tmp.path().join(&name));
    assert_eq!(entries(run.exp_dir())?, vec!["checkpoint", "log.log", "result"]);
    Ok(())
}

#[test]
fn test_record_param_without_args() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let config = RunConfig::default()
        .log_root(tmp.path())
        .record_param(["model.lr"]);
    let run = RunContext::new_at(&config, None, &new_year(), buffered)?;
    assert_eq!(run.identity().name(), "2024-01-01_00-00-00");
    Ok(())
}

#[test]
fn test_unresolved_param_creates_nothing() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let log_root = tmp.path().join("logs");
    let args = Config::new(json!({"model": {"lr": 0.01}}));
    let config = RunConfig::default()
        .log_root(&log_root)
        .record_param(["model.lr", "model.decay"]);

    let res = RunContext::new_at(&config, Some(&args), &new_year(), buffered);
    assert!(matches!(res, Err(MlgError::ConfigPathError { .. })));
    assert!(!log_root.exists());
    Ok(())
}

#[test]
fn test_collision_in_same_second() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let args = Config::new(json!({"seed": 1}));
    let config = RunConfig::default()
        .log_root(tmp.path())
        .record_param(["seed"]);

    let first = RunContext::new_at(&config, Some(&args), &new_year(), buffered)?;
    first.info("first run");
    let log_file = first.layout().log_file();
    let log_before = fs::read_to_string(&log_file)?;

    let second = RunContext::new_at(&config, Some(&args), &new_year(), buffered);
    match second {
        Err(MlgError::DirectoryCollision(path)) => assert_eq!(path, first.exp_dir()),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("second run must collide"),
    }
    assert_eq!(fs::read_to_string(&log_file)?, log_before);
    assert_eq!(load_snapshot(first.exp_dir())?, args);
    Ok(())
}

#[test]
fn test_log_lines() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let config = RunConfig::default().log_root(tmp.path());
    let run = RunContext::new_at(&config, None, &new_year(), buffered)?;

    run.info("episode 1");
    run.warn(format!("reward {}", -1.5));
    run.debug("debug line");
    run.trace("below the sink level");
    let log_file = run.layout().log_file();
    let logger = run.logger().clone();
    run.shutdown()?;
    logger.log(Level::Info, format_args!("after shutdown"));

    let text = fs::read_to_string(&log_file)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(" -- INFO -- episode 1"));
    assert!(lines[1].ends_with(" -- WARN -- reward -1.5"));
    assert!(lines[2].ends_with(" -- DEBUG -- debug line"));
    Ok(())
}

#[test]
fn test_metrics_are_delegated() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let config = RunConfig::default().log_root(tmp.path());
    let mut run = RunContext::new_at(&config, None, &new_year(), buffered)?;

    run.add_scalar("loss", 0.5, 10)?;
    let mut record = Record::from_scalar("reward", 1.0);
    record.insert("env", RecordValue::String("CartPole".to_string()));
    run.write(20, record)?;
    run.flush()?;

    let recorder = run.recorder();
    assert_eq!(recorder.len(), 2);
    assert_eq!(recorder.n_flushes(), 1);
    let steps: Vec<usize> = recorder.iter().map(|(s, _)| *s).collect();
    assert_eq!(steps, vec![10, 20]);
    assert_eq!(recorder.iter().next().unwrap().1.get_scalar("loss")?, 0.5);
    Ok(())
}

#[test]
fn test_recorder_opens_on_run_root() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let config = RunConfig::default().log_root(tmp.path());
    let mut opened_at = None;
    let run = RunContext::new_at(&config, None, &new_year(), |dir| {
        opened_at = Some(dir.to_path_buf());
        Ok(NullRecorder::default())
    })?;
    assert_eq!(opened_at.as_deref(), Some(run.exp_dir()));
    Ok(())
}

#[test]
fn test_drop_removes_sinks() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let config = RunConfig::default().log_root(tmp.path());
    let run = RunContext::new_at(&config, None, &new_year(), buffered)?;

    let logger = run.logger().clone();
    assert!(logger.sink_count() >= 1);
    drop(run);
    assert_eq!(logger.sink_count(), 0);
    Ok(())
}

#[test]
fn test_recorder_failure_is_fatal() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let config = RunConfig::default().log_root(tmp.path());
    let res = RunContext::<NullRecorder>::new_at(&config, None, &new_year(), |dir| {
        Err(MlgError::SinkAttachError {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    });
    assert!(matches!(res, Err(MlgError::SinkAttachError { .. })));

    // The layout stays behind.
    let root = tmp.path().join("2024-01-01_00-00-00");
    assert!(root.join("checkpoint").is_dir());
    Ok(())
}

#[test]
fn test_unusable_log_root_opens_nothing() -> Result<()> {
    let tmp = TempDir::new("run_context")?;
    let log_root = tmp.path().join("logs");
    fs::write(&log_root, "")?;
    let config = RunConfig::default().log_root(&log_root);

    let mut opened = false;
    let res = RunContext::new_at(&config, None, &new_year(), |_| {
        opened = true;
        Ok(NullRecorder::default())
    });
    assert!(matches!(res, Err(MlgError::DirectoryCreateError { .. })));
    assert!(!opened);
    assert!(log_root.is_file());
    Ok(())
}
