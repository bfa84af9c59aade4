//! List and State benchmarks for buildfiles-core

use buildfiles_core::{FileList, FileSystem, Glob, LocalFileSystem, Path, Paths, State};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

/// 20 directories of 50 files each
fn fixture() -> (TempDir, Path) {
    let temp_dir = TempDir::new().expect("temp dir");
    let base = Path::from(temp_dir.path());
    let fs = LocalFileSystem;

    for dir in 0..20 {
        let dir_path = base.clone() + format!("dir{}", dir).as_str();
        fs.create_dir_all(&dir_path).expect("create dir");
        for file in 0..50 {
            let extension = if file % 2 == 0 { "c" } else { "h" };
            fs.touch(&(dir_path.clone() + format!("file{}.{}", file, extension).as_str()))
                .expect("touch");
        }
    }

    (temp_dir, base)
}

fn bench_path_operations(c: &mut Criterion) {
    let path = Path::with_root("/project/src/lib/module/file.c", "/project");

    c.bench_function("path_rebase", |b| {
        b.iter(|| black_box(path.rebase("/build")));
    });

    c.bench_function("path_shortest_path", |b| {
        b.iter(|| black_box(path.shortest_path("/project/test/unit")));
    });

    c.bench_function("path_matches", |b| {
        b.iter(|| black_box(path.matches("**/*.c")));
    });
}

fn bench_list_enumeration(c: &mut Criterion) {
    let (_temp_dir, base) = fixture();

    c.bench_function("glob_recursive_1000", |b| {
        let glob = Glob::new(base.clone(), "**/*.c").expect("glob");
        b.iter(|| black_box(glob.count()));
    });

    c.bench_function("difference_1000", |b| {
        let sources = base.glob("**/*").expect("glob") - base.glob("**/*.h").expect("glob");
        b.iter(|| black_box(sources.count()));
    });

    c.bench_function("paths_contains", |b| {
        let paths = Paths::directory(base.full_path(), (0..1000).map(|i| format!("f{}.c", i)));
        let probe = base.clone() + "f999.c";
        b.iter(|| black_box(paths.contains(&probe)));
    });
}

fn bench_state_update(c: &mut Criterion) {
    let (_temp_dir, base) = fixture();
    let mut state = State::new(base.glob("**/*").expect("glob"));

    c.bench_function("state_update_1000", |b| {
        b.iter(|| black_box(state.update()));
    });
}

criterion_group!(benches, bench_path_operations, bench_list_enumeration, bench_state_update);
criterion_main!(benches);
