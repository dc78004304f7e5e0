// Copyright 2023 Remi Bernotavicius

fn main() {
    // Migrations are embedded at compile time, so edits to them must trigger a rebuild.
    println!("cargo:rerun-if-changed=migrations/");
}
