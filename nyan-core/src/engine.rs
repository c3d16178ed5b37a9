//! Graph construction from manifest files and the coroutine-style
//! scheduling walk described for the Engine.
//!
//! The Engine owns two arenas — `Vec<Script>` and `Vec<Communicator>` —
//! plus a path-keyed registry for deduplication and the active-call
//! stack that drives scheduling. Scripts and Communicators reference
//! each other only by [`ScriptId`]/[`CommunicatorId`]; there is no
//! `Script <-> Communicator` back-pointer cycle to manage.

use {
    crate::{
        communicator::Communicator,
        config::Config,
        error::{LoaderError, RuntimeError},
        label::{CommunicatorId, ScriptId},
        loader::load_script,
        script::{Role, Script, Signal},
    },
    std::{
        collections::HashMap,
        io::{Read, Write},
        path::{Path, PathBuf},
    },
    tracing::{debug, trace},
};

/// A script queued for manifest expansion: its id, its own directory
/// (manifest paths are resolved relative to it), and the manifest
/// entries still to be processed.
struct PendingExpansion
{
    script: ScriptId,
    dir: PathBuf,
}

/// The graph of scripts and communicators plus the scheduler state
/// needed to run them to completion.
pub struct Engine
{
    config: Config,
    scripts: Vec<Script>,
    communicators: Vec<Communicator>,
    by_path: HashMap<PathBuf, ScriptId>,
    root: ScriptId,
    /// The active-call stack. Empty means "the root is current but has
    /// not yet paused"; this mirrors the spec's "bottom is implicit".
    stack: Vec<ScriptId>,
}

impl Engine
{
    /// Load the script graph rooted at `path` and construct an Engine
    /// ready to run it.
    pub fn load(path: &Path, config: Config) -> Result<Self, LoaderError>
    {
        let mut engine = Self{
            config,
            scripts: Vec::new(),
            communicators: Vec::new(),
            by_path: HashMap::new(),
            root: ScriptId(0),
            stack: Vec::new(),
        };

        let root_path = canonicalize(path)?;
        let root = engine.load_one(&root_path, Role::Root)?;
        engine.root = root;

        let root_dir = root_path.parent().unwrap_or(Path::new(".")).to_owned();
        let mut worklist = vec![PendingExpansion{script: root, dir: root_dir}];

        while let Some(PendingExpansion{script, dir}) = worklist.pop() {
            let manifest = engine.scripts[script.0].manifest.take();
            let Some(entries) = manifest else { continue };

            let mut local_ports = std::collections::HashSet::new();
            let mut remote_ports = std::collections::HashSet::new();

            let script_path = engine.scripts[script.0].path.clone();

            for entry in entries {
                if !local_ports.insert(entry.local_port) {
                    return Err(LoaderError::LocalPortConflict{path: script_path, port: entry.local_port});
                }
                if !remote_ports.insert(entry.remote_port) {
                    return Err(LoaderError::RemotePortConflict{path: script_path, port: entry.remote_port});
                }

                let child_path = canonicalize(&dir.join(&entry.path))?;
                let (child_id, freshly_loaded) = match engine.by_path.get(&child_path) {
                    Some(&id) => (id, false),
                    None => (engine.load_one(&child_path, Role::Sub)?, true),
                };

                let comm_id = CommunicatorId(engine.communicators.len());
                engine.communicators.push(Communicator::new(script, child_id));

                // `local_ports`/`remote_ports` above already rule out
                // this script declaring the same local port twice, so
                // `children` can never collide here. `parents` is the
                // one map a *different* script's expansion can also be
                // writing to (the diamond case from an Open Question):
                // two distinct parents both claiming the same remote
                // port on this child.
                engine.scripts[script.0].children.insert(entry.local_port, comm_id);

                if let Some(&existing) = engine.scripts[child_id.0].parents.get(&entry.remote_port) {
                    if engine.config.duplicate_binding_policy == crate::config::DuplicateBindingPolicy::Error {
                        let existing_parent = engine.scripts[engine.communicators[existing.0].peer(child_id).0].path.clone();
                        return Err(LoaderError::DuplicateBinding{
                            child: child_path,
                            existing_parent,
                            port: entry.remote_port,
                        });
                    }
                }
                engine.scripts[child_id.0].parents.insert(entry.remote_port, comm_id);

                if freshly_loaded {
                    let child_dir = child_path.parent().unwrap_or(Path::new(".")).to_owned();
                    worklist.push(PendingExpansion{script: child_id, dir: child_dir});
                }
            }
        }

        Ok(engine)
    }

    fn load_one(&mut self, path: &Path, role: Role) -> Result<ScriptId, LoaderError>
    {
        let (program, manifest) = load_script(path)?;
        let id = ScriptId(self.scripts.len());
        let mut script = Script::new(id, path.to_owned(), role, program);
        script.manifest = manifest;
        self.scripts.push(script);
        self.by_path.insert(path.to_owned(), id);
        Ok(id)
    }

    /// Drive the scheduling loop to completion, reading from `input` and
    /// writing to `output`.
    ///
    /// Returns `Ok(())` on a clean `MAIN_EOF`; any fatal [`RuntimeError`]
    /// aborts the walk and is propagated, matching the spec's "a fatal
    /// error in any script aborts the whole engine" rule.
    pub fn run(&mut self, mut input: impl Read, mut output: impl Write) -> Result<(), RuntimeError>
    {
        loop {
            let current = self.stack.last().copied().unwrap_or(self.root);
            let debug = self.config.debug;

            let communicators = &mut self.communicators;
            let policy = self.config.full_slot_policy;

            let signal = {
                let script = &mut self.scripts[current.0];
                script.step_until_signal(
                    debug,
                    |comm, caller, value, port| {
                        communicators[comm.0].send(caller, value, policy, port)
                    },
                    |comm, caller| communicators[comm.0].receive(caller),
                    || {
                        let mut byte = [0u8];
                        if input.read(&mut byte).unwrap_or(0) == 1 { byte[0] } else { 0 }
                    },
                    |args| { let _ = output.write_fmt(args); },
                )?
            };

            match signal {
                Signal::Pause{parent_mode, port} => {
                    trace!(script = current.0, parent_mode, port, "pause");
                    let comm_id = self.scripts[current.0]
                        .current_port_communicator()
                        .expect("PortUnbound would have aborted before returning Pause");
                    let peer = self.communicators[comm_id.0].peer(current);

                    // Cycle rule: if we are resuming the script two
                    // below the top (the one that paused us in the
                    // first place), pop back to it instead of growing
                    // the stack further.
                    let resuming_caller = self.stack.len() >= 2
                        && self.stack[self.stack.len() - 2] == peer;

                    if resuming_caller {
                        self.stack.pop();
                    } else {
                        self.stack.push(peer);
                    }
                }
                Signal::SubEof => {
                    debug!(script = current.0, "sub script reached EOF, resetting");
                    self.scripts[current.0].reset();
                    self.stack.pop();
                }
                Signal::MainEof => {
                    trace!("root script reached EOF");
                    return Ok(());
                }
            }
        }
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, LoaderError>
{
    std::fs::canonicalize(path).map_err(|source| LoaderError::Io{path: path.to_owned(), source})
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str)
    {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn single_script_runs_to_main_eof()
    {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.nyan", "냥냥.");

        let mut engine = Engine::load(&dir.path().join("a.nyan"), Config::default()).unwrap();
        let mut out = Vec::new();
        engine.run(std::io::empty(), &mut out).unwrap();
        assert_eq!(out, "\u{2}".as_bytes());
    }

    #[test]
    fn ping_pong_cycle_stays_bounded_and_prints_a()
    {
        let dir = tempfile::tempdir().unwrap();
        // A writes 65 on its (child-side) port 0 then halts; B receives
        // it on the matching parent-side port, set up automatically by
        // the one Communicator A's manifest entry creates — B needs no
        // manifest of its own to talk back to its parent.
        write(dir.path(), "a.nyan", &"냥".repeat(65) + ";");
        write(dir.path(), "a.mouse", "0->0: b.nyan\n");
        write(dir.path(), "b.nyan", "':.");

        let mut engine = Engine::load(&dir.path().join("a.nyan"), Config::default()).unwrap();
        let mut out = Vec::new();
        engine.run(std::io::empty(), &mut out).unwrap();
        assert_eq!(out, b"A");
    }

    #[test]
    fn cat_reads_stdin_until_eof()
    {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cat.nyan", ",~.,-");

        let mut engine = Engine::load(&dir.path().join("cat.nyan"), Config::default()).unwrap();
        let mut out = Vec::new();
        engine.run(std::io::Cursor::new(b"abc".to_vec()), &mut out).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn unbound_port_aborts_the_whole_engine()
    {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.nyan", ";");

        let mut engine = Engine::load(&dir.path().join("a.nyan"), Config::default()).unwrap();
        let result = engine.run(std::io::empty(), std::io::sink());
        assert!(matches!(result, Err(RuntimeError::PortUnbound{port: 0, parent_mode: false})));
    }

    #[test]
    fn duplicate_local_port_is_rejected()
    {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.nyan", ".");
        write(dir.path(), "a.mouse", "0->0: b.nyan\n0->1: c.nyan\n");
        write(dir.path(), "b.nyan", ".");
        write(dir.path(), "c.nyan", ".");

        let result = Engine::load(&dir.path().join("a.nyan"), Config::default());
        assert!(matches!(result, Err(LoaderError::LocalPortConflict{port: 0, ..})));
    }

    #[test]
    fn diamond_binding_is_rejected_by_default()
    {
        let dir = tempfile::tempdir().unwrap();
        // `a` and `b` are two distinct scripts that both declare `c` as
        // a child bound to remote port 1; since that binding lands on
        // `c.parents[1]` from two different Communicators, the second
        // one to run is rejected rather than silently dropping the
        // first script's connectivity to `c`.
        write(dir.path(), "a.nyan", ".");
        write(dir.path(), "a.mouse", "0->1: c.nyan\n");
        write(dir.path(), "b.nyan", ".");
        write(dir.path(), "b.mouse", "0->1: c.nyan\n");
        write(dir.path(), "root.nyan", ".");
        write(dir.path(), "root.mouse", "0->0: a.nyan\n1->1: b.nyan\n");
        write(dir.path(), "c.nyan", ".");

        let result = Engine::load(&dir.path().join("root.nyan"), Config::default());
        assert!(matches!(result, Err(LoaderError::DuplicateBinding{..})));
    }

    #[test]
    fn same_child_path_reused_across_distinct_ports()
    {
        let dir = tempfile::tempdir().unwrap();
        // Two distinct local ports, each bound to a distinct remote port
        // on the same child path, must reuse one Script instance rather
        // than constructing `c.nyan` twice.
        write(dir.path(), "a.nyan", ".");
        write(dir.path(), "a.mouse", "0->0: c.nyan\n1->1: c.nyan\n");
        write(dir.path(), "c.nyan", ".");

        let engine = Engine::load(&dir.path().join("a.nyan"), Config::default()).unwrap();
        assert_eq!(engine.scripts.len(), 2);
    }
}
