//! Turns the commit graph into the owned commit list the driver replays.
//!
//! Each commit is diffed against its first parent (or the empty tree for a
//! root commit) with rename detection. Line numbers are taken from the diff
//! itself: new-file numbers for `+` lines, old-file numbers for `-` lines.
//!
//! The list is always replayable from an empty registry. A walk that does
//! not begin at a root (`from_commit`, or any newest-first walk) is preceded
//! by a snapshot commit that adds the starting tree's files. Newest first
//! plays each commit's diff in reverse, so the animation unwinds the history
//! from the tip. A change to a file the replay never added (its earlier
//! history was filtered out) becomes an add of the file's full content.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ganim_core::{ChangeKind, Commit, LineMap, Modification};
use git2::{Delta, Diff, DiffDelta, DiffFindOptions, DiffOptions, Oid, Repository, Sort, Tree};

use crate::git::types::{MineError, MineOptions};

/// Walks `repo` and returns every commit in range, oldest first unless
/// `opts.newest_first` is set.
///
/// Commits whose changes are all filtered out are still returned, with an
/// empty modification list, so their label is shown. A repository with no
/// commits, or an empty range, yields an empty list.
pub fn mine(repo: &Repository, opts: &MineOptions) -> Result<Vec<Commit>, MineError> {
    let tip = match &opts.to_commit {
        Some(spec) => resolve(repo, spec)?,
        None => {
            if repo.is_empty()? {
                tracing::info!("repository has no commits");
                return Ok(Vec::new());
            }
            repo.head()?.peel_to_commit()?.id()
        }
    };
    let mut walk = repo.revwalk()?;
    let mut sorting = Sort::TOPOLOGICAL;
    if !opts.newest_first {
        sorting |= Sort::REVERSE;
    }
    walk.set_sorting(sorting)?;
    walk.push(tip)?;
    let base = match &opts.from_commit {
        Some(spec) => {
            let oid = resolve(repo, spec)?;
            walk.hide(oid)?;
            Some(oid)
        }
        None => None,
    };

    let oids = walk.collect::<Result<Vec<Oid>, _>>()?;
    if oids.is_empty() {
        tracing::info!("commit range is empty");
        return Ok(Vec::new());
    }

    let mut replay = Replay::new(repo, opts);
    let mut commits = Vec::with_capacity(oids.len() + 1);
    let start = if opts.newest_first { Some(tip) } else { base };
    if let Some(oid) = start {
        commits.push(replay.snapshot(&repo.find_commit(oid)?)?);
    }
    for oid in oids {
        commits.push(replay.commit(&repo.find_commit(oid)?)?);
    }
    tracing::info!(commits = commits.len(), "history mined");
    Ok(commits)
}

fn resolve(repo: &Repository, spec: &str) -> Result<Oid, MineError> {
    repo.revparse_single(spec)
        .and_then(|obj| obj.peel_to_commit())
        .map(|c| c.id())
        .map_err(|source| MineError::Revision {
            spec: spec.to_owned(),
            source,
        })
}

/// Builds commits in replay order while tracking which paths the driver's
/// registry will hold at each point.
struct Replay<'r> {
    repo: &'r Repository,
    opts: &'r MineOptions,
    live: HashSet<PathBuf>,
}

impl<'r> Replay<'r> {
    fn new(repo: &'r Repository, opts: &'r MineOptions) -> Self {
        Self {
            repo,
            opts,
            live: HashSet::new(),
        }
    }

    /// Adds every file of `commit`'s tree, labelled with `commit`.
    fn snapshot(&mut self, commit: &git2::Commit<'_>) -> Result<Commit, MineError> {
        let tree = commit.tree()?;
        let diff = self.diff(None, Some(&tree))?;
        tracing::debug!(commit = %commit.id(), "starting snapshot");
        self.finish(commit, &diff, Some(&tree))
    }

    fn commit(&mut self, commit: &git2::Commit<'_>) -> Result<Commit, MineError> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };
        if self.opts.newest_first {
            let diff = self.diff(Some(&tree), parent_tree.as_ref())?;
            self.finish(commit, &diff, parent_tree.as_ref())
        } else {
            let diff = self.diff(parent_tree.as_ref(), Some(&tree))?;
            self.finish(commit, &diff, Some(&tree))
        }
    }

    fn diff(&self, old: Option<&Tree<'_>>, new: Option<&Tree<'_>>) -> Result<Diff<'r>, git2::Error> {
        let mut diff_opts = DiffOptions::new();
        diff_opts.context_lines(0).ignore_filemode(true);
        let mut diff = self.repo.diff_tree_to_tree(old, new, Some(&mut diff_opts))?;
        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;
        Ok(diff)
    }

    /// `new_tree` is the tree the diff leads to; untracked files are read
    /// from it in full.
    fn finish(
        &mut self,
        commit: &git2::Commit<'_>,
        diff: &Diff<'_>,
        new_tree: Option<&Tree<'_>>,
    ) -> Result<Commit, MineError> {
        let mut modifications = Vec::new();
        for m in collect_modifications(diff)? {
            if !keep(&m, self.opts) {
                continue;
            }
            if let Some(m) = self.settle(m, new_tree)? {
                modifications.push(m);
            }
        }

        tracing::debug!(
            commit = %commit.id(),
            modifications = modifications.len(),
            "mined commit"
        );
        Ok(Commit {
            author: commit.author().name().unwrap_or("unknown").to_owned(),
            message: commit.summary().unwrap_or_default().to_owned(),
            modifications,
        })
    }

    /// Rewrites `m` so it applies to the paths replayed so far, then records
    /// its effect. Deleting an untracked file is dropped; editing or moving
    /// one becomes an add of its full new content.
    fn settle(
        &mut self,
        m: Modification,
        new_tree: Option<&Tree<'_>>,
    ) -> Result<Option<Modification>, MineError> {
        let tracked = m.old_path.as_ref().is_some_and(|p| self.live.contains(p));
        let m = match m.kind {
            ChangeKind::Add => m,
            ChangeKind::Delete | ChangeKind::Modify | ChangeKind::Rename if tracked => m,
            ChangeKind::Delete => return Ok(None),
            ChangeKind::Modify | ChangeKind::Rename => {
                let Some(path) = m.new_path else {
                    return Ok(None);
                };
                let added = match new_tree {
                    Some(tree) => blob_lines(self.repo, tree, &path)?,
                    None => LineMap::new(),
                };
                tracing::debug!(path = %path.display(), "untracked change replayed as add");
                Modification::add(path, added)
            }
        };
        if let Some(old) = &m.old_path {
            self.live.remove(old);
        }
        if let Some(new) = &m.new_path {
            self.live.insert(new.clone());
        }
        Ok(Some(m))
    }
}

/// Every line of the blob at `path` in `tree`, numbered from 1. Binary blobs
/// have none.
fn blob_lines(repo: &Repository, tree: &Tree<'_>, path: &Path) -> Result<LineMap, git2::Error> {
    let blob = tree.get_path(path)?.to_object(repo)?.peel_to_blob()?;
    if blob.is_binary() {
        return Ok(LineMap::new());
    }
    Ok(String::from_utf8_lossy(blob.content())
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.to_owned()))
        .collect())
}

/// One [`Modification`] per delta, line maps filled from the line callback.
///
/// Binary deltas never reach the line callback and keep empty maps.
fn collect_modifications(diff: &Diff<'_>) -> Result<Vec<Modification>, git2::Error> {
    let mods: RefCell<Vec<Modification>> = RefCell::new(Vec::new());

    diff.foreach(
        &mut |delta, _progress| {
            mods.borrow_mut().push(modification_for(&delta));
            true
        },
        None,
        None,
        Some(&mut |_delta, _hunk, line| {
            let mut mods = mods.borrow_mut();
            if let Some(m) = mods.last_mut() {
                let text = String::from_utf8_lossy(line.content())
                    .trim_end_matches(['\n', '\r'])
                    .to_owned();
                match (line.origin(), line.old_lineno(), line.new_lineno()) {
                    ('+', _, Some(n)) => {
                        m.added.insert(n as usize, text);
                    }
                    ('-', Some(n), _) => {
                        m.deleted.insert(n as usize, text);
                    }
                    _ => {}
                }
            }
            true
        }),
    )?;

    Ok(mods.into_inner())
}

fn modification_for(delta: &DiffDelta<'_>) -> Modification {
    let old = delta.old_file().path().map(Path::to_path_buf);
    let new = delta.new_file().path().map(Path::to_path_buf);
    let kind = match delta.status() {
        Delta::Added | Delta::Copied | Delta::Untracked => ChangeKind::Add,
        Delta::Deleted => ChangeKind::Delete,
        Delta::Renamed => ChangeKind::Rename,
        _ => ChangeKind::Modify,
    };
    // libgit2 fills both sides even for adds and deletes.
    let (old_path, new_path) = match kind {
        ChangeKind::Add => (None, new.or(old)),
        ChangeKind::Delete => (old.or(new), None),
        ChangeKind::Modify | ChangeKind::Rename => {
            let old = old.or_else(|| new.clone());
            (old.clone(), new.or(old))
        }
    };
    Modification {
        old_path,
        new_path,
        kind,
        added: LineMap::new(),
        deleted: LineMap::new(),
    }
}

fn keep(m: &Modification, opts: &MineOptions) -> bool {
    let paths = || m.old_path.iter().chain(m.new_path.iter());
    let targeted = opts.targets.is_empty()
        || paths().any(|p| {
            opts.targets
                .iter()
                .any(|t| t.strip_prefix(".").unwrap_or(t.as_path()) == p.as_path())
        });
    let typed = opts.only_file_types.is_empty()
        || paths().any(|p| has_file_type(p, &opts.only_file_types));
    targeted && typed
}

fn has_file_type(path: &Path, types: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| types.iter().any(|t| t.strip_prefix('.') == Some(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::TuiStage;
    use ganim_core::{line_map, transport, FileRegistry, Playback, PlaybackConfig};
    use git2::{IndexAddOption, Signature};
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    struct Fixture {
        repo: Repository,
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let repo = Repository::init(dir.path()).unwrap();
            Self { repo, dir }
        }

        fn write(&self, path: &str, body: &[u8]) {
            let full = self.dir.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, body).unwrap();
        }

        fn remove(&self, path: &str) {
            std::fs::remove_file(self.dir.path().join(path)).unwrap();
        }

        fn rename(&self, from: &str, to: &str) {
            std::fs::rename(self.dir.path().join(from), self.dir.path().join(to)).unwrap();
        }

        /// Stages the whole work tree (including removals) and commits it.
        fn commit(&self, message: &str) -> Oid {
            let mut index = self.repo.index().unwrap();
            index.update_all(["*"], None).unwrap();
            index.add_all(["*"], IndexAddOption::DEFAULT, None).unwrap();
            index.write().unwrap();
            let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
            let sig = Signature::now("mark", "mark@example.com").unwrap();
            let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
            let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
            self.repo
                .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
                .unwrap()
        }

        fn mine(&self, opts: &MineOptions) -> Vec<Commit> {
            mine(&self.repo, opts).unwrap()
        }
    }

    fn messages(commits: &[Commit]) -> Vec<&str> {
        commits.iter().map(|c| c.message.as_str()).collect()
    }

    /// Plays `commits` to the end and returns the files left behind.
    async fn replay(commits: &[Commit]) -> ganim_core::Result<FileRegistry> {
        let (tx, _rx) = mpsc::unbounded_channel();
        let config = PlaybackConfig::default();
        let (_ctl, pacer) = transport(&config);
        let mut pb = Playback::new(config, TuiStage::new(tx), pacer);
        pb.run(commits).await?;
        Ok(pb.into_parts().0)
    }

    fn content(reg: &FileRegistry, path: &str) -> Vec<String> {
        reg.get(Path::new(path)).unwrap().content.clone()
    }

    #[test]
    fn add_then_edit() {
        let fx = Fixture::new();
        fx.write("a.txt", b"one\ntwo\n");
        fx.commit("init");
        fx.write("a.txt", b"one\nTWO\nthree\n");
        fx.commit("edit");

        let commits = fx.mine(&MineOptions::default());
        assert_eq!(messages(&commits), vec!["init", "edit"]);
        assert_eq!(commits[0].label(), "mark: init");

        let add = &commits[0].modifications[0];
        assert_eq!(add.kind, ChangeKind::Add);
        assert_eq!(add.old_path, None);
        assert_eq!(add.new_path, Some(PathBuf::from("a.txt")));
        assert_eq!(add.added, line_map([(1, "one"), (2, "two")]));
        assert!(add.deleted.is_empty());

        let edit = &commits[1].modifications[0];
        assert_eq!(edit.kind, ChangeKind::Modify);
        assert_eq!(edit.old_path, edit.new_path);
        assert_eq!(edit.added, line_map([(2, "TWO"), (3, "three")]));
        assert_eq!(edit.deleted, line_map([(2, "two")]));
    }

    #[test]
    fn newest_first_reverses_the_walk() {
        let fx = Fixture::new();
        fx.write("a", b"1\n");
        fx.commit("first");
        fx.write("a", b"2\n");
        fx.commit("second");
        let opts = MineOptions {
            newest_first: true,
            ..MineOptions::default()
        };
        let commits = fx.mine(&opts);
        // Snapshot of the tip, then each commit unwound.
        assert_eq!(messages(&commits), vec!["second", "second", "first"]);
        assert_eq!(commits[0].modifications[0].added, line_map([(1, "2")]));
        let undo = &commits[1].modifications[0];
        assert_eq!(undo.kind, ChangeKind::Modify);
        assert_eq!(undo.added, line_map([(1, "1")]));
        assert_eq!(undo.deleted, line_map([(1, "2")]));
        assert_eq!(commits[2].modifications[0].kind, ChangeKind::Delete);
    }

    #[test]
    fn delete_uses_old_line_numbers() {
        let fx = Fixture::new();
        fx.write("gone.txt", b"a\nb\n");
        fx.commit("add");
        fx.remove("gone.txt");
        fx.commit("rm");

        let commits = fx.mine(&MineOptions::default());
        let rm = &commits[1].modifications[0];
        assert_eq!(rm.kind, ChangeKind::Delete);
        assert_eq!(rm.old_path, Some(PathBuf::from("gone.txt")));
        assert_eq!(rm.new_path, None);
        assert_eq!(rm.deleted, line_map([(1, "a"), (2, "b")]));
        assert!(rm.added.is_empty());
    }

    #[test]
    fn identical_move_is_a_pure_rename() {
        let fx = Fixture::new();
        fx.write("old.rs", b"fn main() {}\n");
        fx.commit("add");
        fx.rename("old.rs", "new.rs");
        fx.commit("mv");

        let commits = fx.mine(&MineOptions::default());
        assert_eq!(commits[1].modifications.len(), 1);
        let mv = &commits[1].modifications[0];
        assert_eq!(mv.kind, ChangeKind::Rename);
        assert_eq!(mv.old_path, Some(PathBuf::from("old.rs")));
        assert_eq!(mv.new_path, Some(PathBuf::from("new.rs")));
        assert!(mv.touched_lines().is_empty());
    }

    #[test]
    fn binary_files_have_no_line_maps() {
        let fx = Fixture::new();
        fx.write("blob.bin", &[0, 159, 146, 150, 0, 1]);
        fx.commit("bin");
        let commits = fx.mine(&MineOptions::default());
        let m = &commits[0].modifications[0];
        assert_eq!(m.kind, ChangeKind::Add);
        assert!(m.added.is_empty());
    }

    #[test]
    fn file_type_filter_keeps_the_commit() {
        let fx = Fixture::new();
        fx.write("src/lib.rs", b"pub fn f() {}\n");
        fx.write("notes.txt", b"hi\n");
        fx.commit("both");
        fx.write("notes.txt", b"bye\n");
        fx.commit("notes only");

        let opts = MineOptions {
            only_file_types: vec![".rs".into()],
            ..MineOptions::default()
        };
        let commits = fx.mine(&opts);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].modifications.len(), 1);
        assert_eq!(commits[0].modifications[0].new_path, Some(PathBuf::from("src/lib.rs")));
        assert!(commits[1].modifications.is_empty());
    }

    #[test]
    fn target_filter_matches_repo_relative_paths() {
        let fx = Fixture::new();
        fx.write("a.txt", b"a\n");
        fx.write("b.txt", b"b\n");
        fx.commit("init");
        let opts = MineOptions {
            targets: vec![PathBuf::from("./b.txt")],
            ..MineOptions::default()
        };
        let commits = fx.mine(&opts);
        let paths: Vec<_> = commits[0].modifications.iter().map(|m| m.new_path.clone()).collect();
        assert_eq!(paths, vec![Some(PathBuf::from("b.txt"))]);
    }

    #[test]
    fn commit_range_bounds_the_walk() {
        let fx = Fixture::new();
        fx.write("f", b"1\n");
        let c1 = fx.commit("c1");
        fx.write("f", b"2\n");
        let c2 = fx.commit("c2");
        fx.write("f", b"3\n");
        fx.commit("c3");

        let after_c1 = MineOptions {
            from_commit: Some(c1.to_string()),
            ..MineOptions::default()
        };
        let commits = fx.mine(&after_c1);
        assert_eq!(messages(&commits), vec!["c1", "c2", "c3"]);
        assert_eq!(commits[0].modifications[0].kind, ChangeKind::Add);
        assert_eq!(commits[0].modifications[0].added, line_map([(1, "1")]));

        let up_to_c2 = MineOptions {
            to_commit: Some(c2.to_string()),
            ..MineOptions::default()
        };
        assert_eq!(messages(&fx.mine(&up_to_c2)), vec!["c1", "c2"]);
    }

    #[test]
    fn empty_repository_has_no_history() {
        let fx = Fixture::new();
        assert!(fx.mine(&MineOptions::default()).is_empty());
    }

    #[test]
    fn unknown_revision_is_reported() {
        let fx = Fixture::new();
        fx.write("f", b"1\n");
        fx.commit("c1");
        let opts = MineOptions {
            from_commit: Some("no-such-ref".into()),
            ..MineOptions::default()
        };
        let err = mine(&fx.repo, &opts).unwrap_err();
        assert!(matches!(err, MineError::Revision { ref spec, .. } if spec == "no-such-ref"));
    }

    #[tokio::test(start_paused = true)]
    async fn history_after_from_commit_replays() {
        let fx = Fixture::new();
        fx.write("f", b"one\ntwo\n");
        let c1 = fx.commit("c1");
        fx.write("f", b"one\nTWO\n");
        fx.commit("c2");

        let opts = MineOptions {
            from_commit: Some(c1.to_string()),
            ..MineOptions::default()
        };
        let reg = replay(&fx.mine(&opts)).await.unwrap();
        assert_eq!(content(&reg, "f"), vec!["one", "TWO"]);
    }

    #[tokio::test(start_paused = true)]
    async fn newest_first_unwinds_to_nothing() {
        let fx = Fixture::new();
        fx.write("a", b"x\n");
        fx.commit("c1");
        fx.write("a", b"y\n");
        fx.write("b", b"b\n");
        fx.commit("c2");

        let opts = MineOptions {
            newest_first: true,
            ..MineOptions::default()
        };
        let reg = replay(&fx.mine(&opts)).await.unwrap();
        assert!(reg.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn renamed_target_starts_as_an_add() {
        let fx = Fixture::new();
        fx.write("a.rs", b"fn a() {}\n");
        fx.commit("add");
        fx.rename("a.rs", "b.rs");
        fx.commit("mv");

        let opts = MineOptions {
            targets: vec![PathBuf::from("b.rs")],
            ..MineOptions::default()
        };
        let commits = fx.mine(&opts);
        assert!(commits[0].modifications.is_empty());
        let add = &commits[1].modifications[0];
        assert_eq!(add.kind, ChangeKind::Add);
        assert_eq!(add.new_path, Some(PathBuf::from("b.rs")));
        assert_eq!(add.added, line_map([(1, "fn a() {}")]));

        let reg = replay(&commits).await.unwrap();
        assert_eq!(content(&reg, "b.rs"), vec!["fn a() {}"]);
    }

    #[tokio::test(start_paused = true)]
    async fn type_filter_across_a_rename_replays() {
        let fx = Fixture::new();
        fx.write("notes.txt", b"a\nb\nc\n");
        fx.commit("add");
        fx.rename("notes.txt", "notes.rs");
        fx.commit("mv");
        fx.write("notes.rs", b"a\nB\nc\n");
        fx.commit("edit");

        let opts = MineOptions {
            only_file_types: vec![".rs".into()],
            ..MineOptions::default()
        };
        let reg = replay(&fx.mine(&opts)).await.unwrap();
        assert_eq!(content(&reg, "notes.rs"), vec!["a", "B", "c"]);
    }
}
