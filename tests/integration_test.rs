// tests/integration_test.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;
use git_batch_release::cli::orchestration::discover;
use git_batch_release::config::Config;
use git_batch_release::domain::{read_field, ChangeStatus, VersionNumber};
use git_batch_release::git::{GitCli, Vcs};
use git_batch_release::inspector::ChangeSetInspector;
use git_batch_release::workflow::{ReleaseWorkflow, WorkflowSettings, WorkflowState};
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Create a repository at `root/name` with `files` committed
fn setup_repo(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let path = root.join(name);
    fs::create_dir_all(&path).expect("Could not create repo dir");
    let repo = Repository::init(&path).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    let mut index = repo.index().expect("Could not get index");
    for (file, content) in files {
        fs::write(path.join(file), content).expect("Could not write file");
        index
            .add_path(Path::new(file))
            .expect("Could not add file to index");
    }
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get sig");
    repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .expect("Could not create commit");

    path
}

fn head_message(path: &Path) -> String {
    let repo = Repository::open(path).unwrap();
    let commit = repo.head().unwrap().peel_to_commit().unwrap();
    commit.message().unwrap_or_default().to_string()
}

#[test]
fn test_help_mentions_binary() {
    let output = Command::new(env!("CARGO_BIN_EXE_git-batch-release"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-batch-release"));
    assert!(stdout.contains("--root"));
}

#[test]
fn test_three_trees_one_dirty() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }

    let root = TempDir::new().unwrap();
    setup_repo(root.path(), "alpha", &[("README.md", "alpha\n")]);
    setup_repo(root.path(), "bravo", &[("README.md", "bravo\n")]);
    let dirty = setup_repo(
        root.path(),
        "charlie",
        &[("Grid.cs", "class Grid {}\n"), ("Tile.cs", "class Tile {}\n")],
    );

    fs::write(dirty.join("Grid.cs"), "class Grid { int size; }\n").unwrap();
    fs::write(dirty.join("Tile.cs"), "class Tile { int x; }\n").unwrap();
    fs::write(dirty.join("Grid.cs.meta"), "guid: 1234\n").unwrap();

    let config = Config::default();
    let vcs = GitCli::new();
    let discovery = discover(root.path(), &config, &vcs).unwrap();

    assert_eq!(discovery.scan.repositories.len(), 3);
    assert_eq!(discovery.pending, vec![dirty.clone()]);

    let set = ChangeSetInspector::new(&vcs, &config.scan.ignored_suffixes).inspect(&dirty);
    assert!(set.has_changes());
    assert_eq!(set.records.len(), 2);
    assert!(set
        .records
        .iter()
        .all(|r| r.status == ChangeStatus::Modified));
    assert!(set.summary.contains("2 files changed"));
}

#[test]
fn test_clean_tree_has_no_changes() {
    if !git_available() {
        return;
    }

    let root = TempDir::new().unwrap();
    let clean = setup_repo(root.path(), "clean", &[("README.md", "clean\n")]);

    let set = ChangeSetInspector::new(&GitCli::new(), &[]).inspect(&clean);
    assert!(!set.has_changes());
    assert!(set.records.is_empty());
}

#[test]
fn test_release_run_commits_and_bumps() {
    if !git_available() {
        return;
    }

    let root = TempDir::new().unwrap();
    let manifest = concat!(
        "{\n",
        "  \"name\": \"com.example.grid\",\n",
        "  \"version\": \"1.2.3\",\n",
        "  \"displayName\": \"Grid\"\n",
        "}\n"
    );
    let first = setup_repo(
        root.path(),
        "grid",
        &[("package.json", manifest), ("Grid.cs", "a\n")],
    );
    let second = setup_repo(root.path(), "tools", &[("Tools.cs", "b\n")]);
    fs::write(first.join("Grid.cs"), "a changed\n").unwrap();
    fs::write(second.join("New.cs"), "new\n").unwrap();

    let mut workflow = ReleaseWorkflow::new(GitCli::new(), WorkflowSettings::default());
    workflow.start(vec![first.clone(), second.clone()]).unwrap();

    let entry = workflow.current().unwrap();
    assert_eq!(entry.display_name, "Grid");
    assert_eq!(entry.next_version, Some(VersionNumber::new(1, 3, 0)));

    // No remote is configured: push fails, the run still advances.
    let report = workflow.confirm("Update grid").unwrap();
    assert_eq!(
        report.bumped,
        Some((VersionNumber::new(1, 2, 3), VersionNumber::new(1, 3, 0)))
    );
    assert!(report.warnings.iter().any(|w| w.to_string().contains("push")));
    assert_eq!(workflow.state(), WorkflowState::AwaitingDecision);

    let text = fs::read_to_string(first.join("package.json")).unwrap();
    assert_eq!(read_field(&text, "version"), Some("1.3.0".to_string()));
    assert_eq!(head_message(&first).trim(), "Update grid");
    assert!(GitCli::new().status_porcelain(&first).unwrap().stdout.is_empty());

    let entry = workflow.current().unwrap();
    assert_eq!(entry.display_name, "tools");
    assert!(entry.current_version.is_none());
    assert_eq!(entry.changes.records[0].status, ChangeStatus::Added);

    workflow.skip().unwrap();
    assert_eq!(workflow.state(), WorkflowState::Complete);
    assert_eq!(head_message(&second).trim(), "Initial commit");
}

#[test]
fn test_list_flag_prints_overview() {
    if !git_available() {
        return;
    }

    let root = TempDir::new().unwrap();
    let dirty = setup_repo(root.path(), "pkg", &[("a.txt", "a\n")]);
    fs::write(dirty.join("a.txt"), "b\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_git-batch-release"))
        .arg("--root")
        .arg(root.path())
        .arg("--list")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Total repositories: 1"));
    assert!(stdout.contains("With changes:       1"));
}
