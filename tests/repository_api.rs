use crate::common::command::{
    MergeHistory, git_stdout, linear_history, merge_history, rev_parse,
};
use crate::common::{AUTHOR_EMAIL, AUTHOR_NAME, BASE_TIMESTAMP};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use revlog::{Error, LogFormat, LogQuery, Repository, Visit};
use rstest::rstest;

mod common;

#[rstest]
fn resolved_commit_bakes_from_git(
    linear_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (dir, ids) = linear_history;
    let repository = Repository::open(dir.path())?;

    let head = repository.resolve("HEAD")?;
    assert_eq!(head.id().as_ref(), ids[2]);

    let commit = repository.commit(&ids[1])?;
    assert!(!commit.is_baked());
    assert_eq!(commit.author()?.name(), AUTHOR_NAME);
    assert_eq!(commit.author()?.email(), AUTHOR_EMAIL);
    assert_eq!(commit.authored_date()?, BASE_TIMESTAMP + 2 * 3600);
    assert_eq!(commit.author_tz_offset()?, 7200);
    assert_eq!(commit.message()?, "Commit 2");
    assert_eq!(commit.tree()?.as_ref(), rev_parse(dir.path(), &format!("{}^{{tree}}", ids[1])));
    assert_eq!(commit.parent_ids()?[0].as_ref(), ids[0]);
    assert!(commit.is_baked());

    Ok(())
}

#[rstest]
fn count_and_iter_parents_walk_the_history(
    linear_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (dir, ids) = linear_history;
    let repository = Repository::open(dir.path())?;
    let head = repository.resolve("HEAD")?;

    assert_eq!(head.count()?, 3);

    for skip in [0, 1] {
        let parents = head
            .iter_parents(LogQuery::default().skip(skip))?
            .map(|commit| commit.map(|commit| commit.id().to_string()))
            .collect::<revlog::Result<Vec<_>>>()?;
        assert_eq!(parents, vec![ids[1].clone(), ids[0].clone()]);
    }

    Ok(())
}

#[rstest]
fn counts_and_parents_can_be_limited_to_paths(
    merge_history: MergeHistory,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository = Repository::open(merge_history.dir.path())?;
    let head = repository.resolve("HEAD")?;

    assert_eq!(head.count_touching(["left.txt"])?, 1);

    let parents = head
        .iter_parents(LogQuery::default().path("left.txt"))?
        .map(|commit| commit.map(|commit| commit.id().to_string()))
        .collect::<revlog::Result<Vec<_>>>()?;
    assert_eq!(parents, vec![merge_history.left.clone()]);

    Ok(())
}

#[rstest]
fn iter_commits_can_stop_early(
    linear_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (dir, ids) = linear_history;
    let repository = Repository::open(dir.path())?;

    let mut commits = repository.iter_commits(&LogQuery::default(), LogFormat::Default)?;
    let first = commits.next().ok_or("empty history")??;
    drop(commits);

    assert_eq!(first.id().as_ref(), ids[2]);
    assert_eq!(first.summary()?, "Commit 3");

    Ok(())
}

#[rstest]
fn parse_commits_reads_bisect_output(
    linear_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (dir, ids) = linear_history;
    let repository = Repository::open(dir.path())?;
    let text = git_stdout(
        dir.path(),
        &["rev-list", "--bisect-all", "--pretty=raw", "--parents", "HEAD"],
    );

    let commits = repository
        .parse_commits(text.as_bytes(), LogFormat::Default)?
        .collect::<revlog::Result<Vec<_>>>()?;

    assert_eq!(commits.len(), ids.len());
    for commit in &commits {
        assert!(
            commit.annotations()?.bisect_distance().is_some(),
            "no distance for {commit}"
        );
    }
    assert!(commits.iter().any(|commit| commit.id().as_ref() == ids[2]));

    Ok(())
}

#[rstest]
fn pretty_format_is_rejected(
    linear_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (dir, _) = linear_history;
    let repository = Repository::open(dir.path())?;

    let result = repository.iter_commits(&LogQuery::default(), "oneline".parse()?);
    assert!(matches!(result, Err(Error::InvalidMode(_))));

    Ok(())
}

#[rstest]
fn unknown_commit_fails_to_bake(
    linear_history: (TempDir, Vec<String>),
) -> Result<(), Box<dyn std::error::Error>> {
    let (dir, _) = linear_history;
    let repository = Repository::open(dir.path())?;

    let ghost = repository.commit("0123456789abcdef0123456789abcdef01234567")?;
    assert!(matches!(ghost.message(), Err(Error::Resolution(_))));

    Ok(())
}

#[rstest]
fn stats_match_git(merge_history: MergeHistory) -> Result<(), Box<dyn std::error::Error>> {
    let repository = Repository::open(merge_history.dir.path())?;
    let left = repository.commit(&merge_history.left)?;

    let stats = left.stats()?;
    assert_eq!(stats.total().files, 1);
    assert_eq!(stats.total().insertions, 1);
    assert_eq!(stats.files()["left.txt"].lines, 1);

    Ok(())
}

#[rstest]
fn merge_traversal_yields_each_commit_once(
    merge_history: MergeHistory,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository = Repository::open(merge_history.dir.path())?;
    let head = repository.resolve("HEAD")?;

    let edges = head
        .traverse()
        .branch_first()
        .as_edge(true)
        .into_iter()
        .collect::<revlog::Result<Vec<_>>>()?;

    assert_eq!(edges.len(), 3);
    let base_edge = edges
        .iter()
        .find(|visit| visit.commit().id().as_ref() == merge_history.base)
        .ok_or("base not visited")?;
    assert!(matches!(base_edge, Visit::Edge(Some(predecessor), _)
        if predecessor.id().as_ref() == merge_history.left));

    Ok(())
}
