use crate::common::{AUTHOR_EMAIL, AUTHOR_NAME, BASE_TIMESTAMP};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_git_command(repository_dir.path(), &["init", "-q", "-b", "main"])
        .assert()
        .success();
    repository_dir
}

/// Three commits on `main`, each adding `file<i>.txt`; returns ids oldest first
#[fixture]
pub fn linear_history(init_repository_dir: TempDir) -> (TempDir, Vec<String>) {
    let ids = (1..=3)
        .map(|i| {
            commit_file(
                init_repository_dir.path(),
                &format!("file{i}.txt"),
                &format!("Content {i}\n"),
                &format!("Commit {i}"),
                i,
            )
        })
        .collect();

    (init_repository_dir, ids)
}

/// ```text
/// base <- left <- merge   (main)
///     \          /
///      <- right           (side)
/// ```
pub struct MergeHistory {
    pub dir: TempDir,
    pub base: String,
    pub left: String,
    pub right: String,
    pub merge: String,
}

#[fixture]
pub fn merge_history(init_repository_dir: TempDir) -> MergeHistory {
    let dir = init_repository_dir.path();

    let base = commit_file(dir, "base.txt", "base\n", "Base", 1);
    run_git_command(dir, &["branch", "side"]).assert().success();
    let left = commit_file(dir, "left.txt", "left\n", "Left", 2);

    run_git_command(dir, &["checkout", "-q", "side"])
        .assert()
        .success();
    let right = commit_file(dir, "right.txt", "right\n", "Right", 3);

    run_git_command(dir, &["checkout", "-q", "main"])
        .assert()
        .success();
    with_dates(
        run_git_command(dir, &["merge", "-q", "--no-ff", "-m", "Merge side", "side"]),
        4,
    )
    .assert()
    .success();
    let merge = rev_parse(dir, "HEAD");

    MergeHistory {
        dir: init_repository_dir,
        base,
        left,
        right,
        merge,
    }
}

pub fn run_revlog_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("revlog").expect("Failed to find revlog binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.envs(vec![
        ("GIT_CONFIG_GLOBAL", "/dev/null"),
        ("GIT_CONFIG_NOSYSTEM", "1"),
        ("GIT_AUTHOR_NAME", AUTHOR_NAME),
        ("GIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("GIT_COMMITTER_NAME", AUTHOR_NAME),
        ("GIT_COMMITTER_EMAIL", AUTHOR_EMAIL),
    ]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Pin author and committer dates to `BASE_TIMESTAMP + tick` hours, in +0200
pub fn with_dates(mut cmd: Command, tick: i64) -> Command {
    let date = format!("@{} +0200", BASE_TIMESTAMP + tick * 3600);
    cmd.env("GIT_AUTHOR_DATE", &date);
    cmd.env("GIT_COMMITTER_DATE", &date);
    cmd
}

/// Write a file, commit it, and return the new commit id
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str, tick: i64) -> String {
    std::fs::write(dir.join(file), content).expect("Failed to write file");
    run_git_command(dir, &["add", file]).assert().success();
    with_dates(run_git_command(dir, &["commit", "-q", "-m", message]), tick)
        .assert()
        .success();

    rev_parse(dir, "HEAD")
}

pub fn rev_parse(dir: &Path, revision: &str) -> String {
    let output = run_git_command(dir, &["rev-parse", revision])
        .output()
        .expect("Failed to run git rev-parse");
    String::from_utf8(output.stdout)
        .expect("git rev-parse printed invalid UTF-8")
        .trim()
        .to_string()
}

pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_git_command(dir, args)
        .output()
        .expect("Failed to run git");
    String::from_utf8(output.stdout).expect("git printed invalid UTF-8")
}
