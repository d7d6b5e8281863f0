//! Watch mode for automatic rebuilds on file changes
//!
//! Runs the build once, then watches the project root and re-runs the tasks
//! bound to whatever changed. Every relevant event dispatches its own
//! invocation on the rayon pool; events are not debounced or coalesced.

use crate::build::{BuildContext, Pipeline, TaskKind, TaskResult};
use glob::{MatchOptions, Pattern};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Error during watch mode
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize file watcher
    #[error("Failed to initialize file watcher: {0}")]
    WatcherInit(#[source] notify::Error),
    /// Failed to add watch path
    #[error("Failed to watch path: {0}")]
    WatchPath(#[source] notify::Error),
    /// Channel receive error
    #[error("Watch channel error: {0}")]
    ChannelError(String),
    /// Project root not found
    #[error("Project root not found: {}", .0.display())]
    RootNotFound(PathBuf),
    /// A binding pattern could not be compiled
    #[error("Invalid watch pattern '{0}': {1}")]
    InvalidPattern(String, #[source] glob::PatternError),
}

fn match_options() -> MatchOptions {
    MatchOptions { case_sensitive: true, require_literal_separator: true, require_literal_leading_dot: false }
}

/// A path pattern, relative to the project root, and the tasks it triggers.
#[derive(Debug, Clone)]
pub struct WatchBinding {
    pub pattern: Pattern,
    /// Run in series; a task that aborts stops the rest
    pub tasks: Vec<TaskKind>,
}

/// All bindings for a project.
#[derive(Debug, Clone)]
pub struct WatchBindings {
    bindings: Vec<WatchBinding>,
}

impl WatchBindings {
    /// Derive the bindings from a build context.
    ///
    /// Paths outside the project root can never produce an event and are
    /// left unbound.
    pub fn for_context(context: &BuildContext) -> Result<Self, WatchError> {
        let config = context.config();
        let root = context.project_root();
        let mut bindings = Vec::new();

        let mut bind = |path: PathBuf, glob: Option<&str>, tasks: Vec<TaskKind>| -> Result<(), WatchError> {
            let relative = match path.strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => {
                    warn!(path = %path.display(), "outside the project root, not watched");
                    return Ok(());
                }
            };
            let literal = Pattern::escape(&relative.to_string_lossy());
            let source = match glob {
                Some(glob) if literal.is_empty() => glob.to_string(),
                Some(glob) => format!("{}/{}", literal.trim_end_matches('/'), glob),
                None => literal,
            };
            let pattern =
                Pattern::new(&source).map_err(|e| WatchError::InvalidPattern(source.clone(), e))?;
            bindings.push(WatchBinding { pattern, tasks });
            Ok(())
        };

        let mut theme_series = vec![TaskKind::Colors];
        theme_series.extend(TaskKind::STYLES);
        bind(context.theme_path(), None, theme_series)?;

        for (task, (_, tree)) in TaskKind::STYLES.into_iter().zip(config.style_trees()) {
            bind(context.resolve_path(&tree.src), Some(tree.watch_pattern()), vec![task])?;
        }

        let scripts = &config.scripts;
        bind(context.resolve_path(&scripts.src), Some(&scripts.pattern), vec![TaskKind::Scripts])?;
        bind(context.blocks_registry_path(), None, vec![TaskKind::ScaffoldBlockStyles])?;
        bind(context.posttypes_registry_path(), None, vec![TaskKind::ScaffoldPostTypes])?;

        Ok(Self { bindings })
    }

    pub fn bindings(&self) -> &[WatchBinding] {
        &self.bindings
    }

    /// Task lists of every binding matching a root-relative path.
    pub fn matching(&self, relative: &Path) -> Vec<&[TaskKind]> {
        self.bindings
            .iter()
            .filter(|b| b.pattern.matches_path_with(relative, match_options()))
            .map(|b| b.tasks.as_slice())
            .collect()
    }
}

/// Whether an event kind should trigger a rebuild.
pub fn is_relevant(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_))
}

/// Something that runs a single task and reports how it went.
pub trait TaskRunner: Send + Sync {
    /// Run `task`; aborts come back as a failed result.
    fn run_task_reported(&self, task: TaskKind) -> TaskResult;
}

impl TaskRunner for Pipeline {
    fn run_task_reported(&self, task: TaskKind) -> TaskResult {
        Pipeline::run_task_reported(self, task)
    }
}

/// Runs task lists off the watch thread.
///
/// When exclusive, a second invocation of a task waits for the first to
/// finish instead of overlapping it.
#[derive(Clone)]
pub struct Dispatcher {
    runner: Arc<dyn TaskRunner>,
    locks: Option<Arc<HashMap<TaskKind, Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn TaskRunner>, exclusive: bool) -> Self {
        let locks = exclusive
            .then(|| Arc::new(TaskKind::ALL.into_iter().map(|t| (t, Mutex::new(()))).collect()));
        Self { runner, locks }
    }

    pub fn is_exclusive(&self) -> bool {
        self.locks.is_some()
    }

    /// Queue `tasks` on the rayon pool and return immediately.
    pub fn dispatch(&self, tasks: Vec<TaskKind>) {
        let dispatcher = self.clone();
        rayon::spawn(move || {
            dispatcher.run(&tasks);
        });
    }

    /// Run `tasks` in series on the current thread. Returns whether every
    /// task completed without aborting.
    pub fn run(&self, tasks: &[TaskKind]) -> bool {
        for &task in tasks {
            let lock = self.locks.as_ref().and_then(|locks| locks.get(&task));
            // A poisoned lock only means an earlier run panicked
            let _guard = lock.map(|l| l.lock().unwrap_or_else(|e| e.into_inner()));

            let result = self.runner.run_task_reported(task);
            if result.status.is_failure() {
                // Already logged by the pipeline; watching continues
                return false;
            }
            for file_error in &result.file_errors {
                debug!(%task, "{}", file_error);
            }
            info!(%task, status = %result.status, outputs = result.outputs.len(), duration = ?result.duration, "rebuilt");
        }
        true
    }
}

/// Translate an event into the task lists it triggers.
pub fn tasks_for_event(
    event: &Event,
    root: &Path,
    canonical_root: &Path,
    bindings: &WatchBindings,
) -> Vec<Vec<TaskKind>> {
    if !is_relevant(&event.kind) {
        return vec![];
    }

    let mut triggered = Vec::new();
    for path in &event.paths {
        let relative = match path.strip_prefix(canonical_root).or_else(|_| path.strip_prefix(root)) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        for tasks in bindings.matching(relative) {
            debug!(path = %relative.display(), ?tasks, "change matched");
            triggered.push(tasks.to_vec());
        }
    }
    triggered
}

/// Build once, then watch the project root until the process is terminated.
///
/// Only setup failures are returned; task failures are logged and watching
/// continues.
pub fn watch(pipeline: Arc<Pipeline>) -> Result<(), WatchError> {
    let context = pipeline.context();
    let root = context.project_root().to_path_buf();
    if !root.is_dir() {
        return Err(WatchError::RootNotFound(root));
    }
    let canonical_root = root.canonicalize().unwrap_or_else(|_| root.clone());

    let bindings = WatchBindings::for_context(context)?;
    let runner: Arc<dyn TaskRunner> = Arc::<Pipeline>::clone(&pipeline);
    let dispatcher = Dispatcher::new(runner, context.config().watch.exclusive);

    let result = pipeline.build();
    println!("{}", result.summary());

    let (tx, rx) = channel();
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(tx).map_err(WatchError::WatcherInit)?;
    watcher.watch(&canonical_root, RecursiveMode::Recursive).map_err(WatchError::WatchPath)?;

    info!(
        root = %root.display(),
        bindings = bindings.bindings().len(),
        exclusive = dispatcher.is_exclusive(),
        "watching for changes"
    );

    loop {
        match rx.recv() {
            Ok(Ok(event)) => {
                for tasks in tasks_for_event(&event, &root, &canonical_root, &bindings) {
                    dispatcher.dispatch(tasks);
                }
            }
            Ok(Err(e)) => {
                error!("watch error: {}", e);
            }
            Err(e) => return Err(WatchError::ChannelError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PorterConfig;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Records how many task invocations were in flight at once.
    ///
    /// Each invocation waits up to `wait` for a second one to join it, so two
    /// dispatches that can overlap reliably do.
    struct OverlapRunner {
        active: AtomicUsize,
        max_active: AtomicUsize,
        wait: Duration,
    }

    impl OverlapRunner {
        fn new(wait: Duration) -> Arc<Self> {
            Arc::new(Self { active: AtomicUsize::new(0), max_active: AtomicUsize::new(0), wait })
        }
    }

    impl TaskRunner for OverlapRunner {
        fn run_task_reported(&self, task: TaskKind) -> TaskResult {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);

            let deadline = Instant::now() + self.wait;
            while self.active.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(5));
            }

            self.active.fetch_sub(1, Ordering::SeqCst);
            TaskResult::success(task, vec![], Duration::ZERO)
        }
    }

    /// Run the same task from two threads at once; returns the peak overlap.
    fn run_twice_concurrently(runner: &Arc<OverlapRunner>, exclusive: bool) -> usize {
        let dispatcher = Dispatcher::new(Arc::clone(runner) as Arc<dyn TaskRunner>, exclusive);
        assert_eq!(dispatcher.is_exclusive(), exclusive);

        thread::scope(|scope| {
            let first = scope.spawn(|| dispatcher.run(&[TaskKind::Scripts]));
            let second = scope.spawn(|| dispatcher.run(&[TaskKind::Scripts]));
            assert!(first.join().unwrap());
            assert!(second.join().unwrap());
        });
        runner.max_active.load(Ordering::SeqCst)
    }

    fn bindings() -> WatchBindings {
        let context = BuildContext::new(PorterConfig::default(), PathBuf::from("/theme"));
        WatchBindings::for_context(&context).unwrap()
    }

    fn matched(rel: &str) -> Vec<Vec<TaskKind>> {
        bindings().matching(Path::new(rel)).into_iter().map(|t| t.to_vec()).collect()
    }

    #[test]
    fn test_theme_triggers_colors_then_styles() {
        let mut expected = vec![TaskKind::Colors];
        expected.extend(TaskKind::STYLES);
        assert_eq!(matched("theme.json"), vec![expected]);
    }

    #[test]
    fn test_style_tree_bindings() {
        assert_eq!(matched("assets/src/scss/main.scss"), vec![vec![TaskKind::Styles]]);
        assert_eq!(matched("assets/src/scss/base/_type.scss"), vec![vec![TaskKind::Styles]]);
        assert_eq!(matched("porter/blocks/hero/scss/style.scss"), vec![vec![TaskKind::Blocks]]);
        assert_eq!(
            matched("porter/inc/block/variations/group/scss/a.scss"),
            vec![vec![TaskKind::Variations]]
        );
    }

    #[test]
    fn test_flat_trees_watch_nested_files() {
        assert_eq!(
            matched("porter/inc/block/styles/scss/partials/_mixins.scss"),
            vec![vec![TaskKind::BlockStyles]]
        );
        assert_eq!(
            matched("porter/inc/block/core/styles/scss/core_button.scss"),
            vec![vec![TaskKind::CoreBlockStyles]]
        );
    }

    #[test]
    fn test_outputs_do_not_match() {
        assert!(matched("assets/dist/css/main.min.css").is_empty());
        assert!(matched("porter/blocks/hero/css/style.css").is_empty());
        assert!(matched("assets/dist/js/main.js").is_empty());
        assert!(matched("porter/inc/block/styles/css/core_image--rounded.css").is_empty());
    }

    #[test]
    fn test_registry_and_script_bindings() {
        assert_eq!(matched("assets/src/js/admin/editor.js"), vec![vec![TaskKind::Scripts]]);
        assert_eq!(matched("porter/config/blocks.json"), vec![vec![TaskKind::ScaffoldBlockStyles]]);
        assert_eq!(
            matched("porter/config/posttypes.json"),
            vec![vec![TaskKind::ScaffoldPostTypes]]
        );
    }

    #[test]
    fn test_tasks_for_event_filters_kinds() {
        let bindings = bindings();
        let root = Path::new("/theme");
        let path = PathBuf::from("/theme/assets/src/js/main.js");

        for kind in [
            EventKind::Create(CreateKind::File),
            EventKind::Modify(ModifyKind::Any),
            EventKind::Remove(RemoveKind::File),
        ] {
            let event = Event::new(kind).add_path(path.clone());
            assert_eq!(tasks_for_event(&event, root, root, &bindings), vec![vec![TaskKind::Scripts]]);
        }

        let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(path);
        assert!(tasks_for_event(&access, root, root, &bindings).is_empty());
    }

    #[test]
    fn test_tasks_for_event_ignores_paths_outside_root() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/elsewhere/assets/src/js/main.js"));
        let root = Path::new("/theme");
        assert!(tasks_for_event(&event, root, root, &bindings()).is_empty());
    }

    #[test]
    fn test_dispatcher_series_stops_after_failure() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("assets/src/js")).unwrap();
        fs::write(temp.path().join("assets/src/js/main.js"), "var a = 1;").unwrap();

        let context = BuildContext::new(PorterConfig::default(), temp.path().to_path_buf());
        let dispatcher = Dispatcher::new(Arc::new(Pipeline::new(context)), true);

        // No theme.json: colors aborts and the scripts task never runs
        assert!(!dispatcher.run(&[TaskKind::Colors, TaskKind::Scripts]));
        assert!(!temp.path().join("assets/dist").exists());

        assert!(dispatcher.run(&[TaskKind::Scripts]));
        assert!(temp.path().join("assets/dist/js/main.js").is_file());
    }

    #[test]
    fn test_exclusive_dispatcher_never_overlaps_a_task() {
        let runner = OverlapRunner::new(Duration::from_millis(200));
        assert_eq!(run_twice_concurrently(&runner, true), 1);
    }

    #[test]
    fn test_default_dispatcher_lets_a_task_overlap() {
        let runner = OverlapRunner::new(Duration::from_secs(5));
        assert_eq!(run_twice_concurrently(&runner, false), 2);
    }

    #[test]
    fn test_exclusive_locks_are_per_task() {
        let runner = OverlapRunner::new(Duration::from_secs(5));
        let dispatcher = Dispatcher::new(Arc::clone(&runner) as Arc<dyn TaskRunner>, true);

        thread::scope(|scope| {
            let first = scope.spawn(|| dispatcher.run(&[TaskKind::Scripts]));
            let second = scope.spawn(|| dispatcher.run(&[TaskKind::Styles]));
            assert!(first.join().unwrap());
            assert!(second.join().unwrap());
        });
        assert_eq!(runner.max_active.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_watch_missing_root() {
        let context =
            BuildContext::new(PorterConfig::default(), PathBuf::from("/nonexistent/theme/root"));
        let err = watch(Arc::new(Pipeline::new(context))).unwrap_err();
        assert!(matches!(err, WatchError::RootNotFound(_)));
    }
}
