// Snapshot runner: drives the harness from the command line.
// Usage: snapshot_runner run --compiler <program> [-- <args>..]

fn main() {
    translator_snapshots::cli::run();
}
