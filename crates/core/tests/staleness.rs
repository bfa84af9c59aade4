//! End-to-end staleness decisions over real files

use buildfiles_core::{FileList, FileSystem, LocalFileSystem, Path, Paths, State};
use filetime::{set_file_mtime, FileTime};
use tempfile::TempDir;

struct Project {
    _temp_dir: TempDir,
    base: Path,
}

impl Project {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let base = Path::from(temp_dir.path());
        Self {
            _temp_dir: temp_dir,
            base,
        }
    }

    fn file(&self, name: &str, seconds: i64) -> Path {
        let path = self.base.clone() + name;
        LocalFileSystem.touch(&path).unwrap();
        set_file_mtime(path.full_path(), FileTime::from_unix_time(seconds, 0)).unwrap();
        path
    }

    fn inputs(&self) -> State {
        State::new(self.base.glob("*.rb").unwrap())
    }

    fn outputs(&self) -> State {
        State::new(Paths::directory(self.base.full_path(), ["out.o"]))
    }
}

#[test]
fn test_output_newer_than_every_input_is_clean() {
    let project = Project::new();
    project.file("a.rb", 1_000);
    project.file("b.rb", 2_000);
    project.file("out.o", 3_000);

    assert!(!project.outputs().dirty(&project.inputs()));
}

#[test]
fn test_output_older_than_newest_input_is_dirty() {
    let project = Project::new();
    project.file("a.rb", 1_000);
    project.file("b.rb", 3_000);
    project.file("out.o", 2_000);

    let inputs = project.inputs();
    let outputs = project.outputs();

    assert!(outputs.dirty(&inputs));
    assert!(State::is_dirty(&inputs, &outputs));
}

#[test]
fn test_equal_times_are_clean() {
    let project = Project::new();
    project.file("a.rb", 2_000);
    project.file("out.o", 2_000);

    assert!(!project.outputs().dirty(&project.inputs()));
}

#[test]
fn test_missing_output_is_dirty_regardless_of_times() {
    let project = Project::new();
    project.file("a.rb", 1_000);

    let outputs = project.outputs();
    assert!(outputs.has_missing());
    assert!(outputs.dirty(&project.inputs()));
}

#[test]
fn test_no_inputs_is_clean() {
    let project = Project::new();
    project.file("out.o", 1_000);

    let inputs = project.inputs();
    assert!(inputs.is_empty());
    assert!(!project.outputs().dirty(&inputs));
}

#[test]
fn test_rebuild_cycle() {
    let project = Project::new();
    project.file("a.rb", 1_000);
    project.file("out.o", 2_000);

    let mut inputs = project.inputs();
    let mut outputs = project.outputs();
    assert!(!outputs.dirty(&inputs));

    // Edit an input
    project.file("a.rb", 3_000);
    assert!(inputs.update());
    assert_eq!(inputs.changed().len(), 1);
    assert!(outputs.dirty(&inputs));

    // Rebuild the output
    project.file("out.o", 4_000);
    assert!(outputs.update());
    assert!(!outputs.dirty(&inputs));

    // Nothing moved since
    assert!(!inputs.update());
    assert!(!outputs.update());
}

#[test]
fn test_copy_all_then_compare() {
    let project = Project::new();
    project.file("a.rb", 1_000);
    project.file("b.rb", 2_000);

    let destination = (project.base.clone() + "copy").to_string();
    let copied = LocalFileSystem
        .copy_all(&project.base.glob("*.rb").unwrap(), &destination)
        .unwrap();

    assert_eq!(copied.count(), 2);
    assert!(LocalFileSystem.all_exist(&copied));
    assert!(copied.iter().all(|path| path.root() == destination));
}
