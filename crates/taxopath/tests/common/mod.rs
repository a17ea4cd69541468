//! Common test utilities shared across integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// ESCO-style skills table: B and D are linked, U is not.
pub const SKILLS: &str = "\
ID,PREFERREDLABEL,SKILLTYPE
B,communicate,skill
D,negotiate,skill
U,unlinked,knowledge
";

/// ESCO-style skill hierarchy: A above B and C, D below both.
pub const HIERARCHY: &str = "\
PARENTOBJECTTYPE,PARENTID,CHILDID,CHILDOBJECTTYPE
skillgroup,A,B,skill
skillgroup,A,C,skillgroup
skill,B,D,skill
skillgroup,C,D,skill
";

/// Labels for the group nodes.
pub const GROUPS: &str = "\
ID,PREFERREDLABEL
A,all skills
C,people skills
";

/// Path to the built taxopath binary
pub fn taxopath_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_taxopath"))
}

/// Run the taxopath binary in the specified directory
pub fn run_taxopath_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(taxopath_binary())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute taxopath binary")
}

/// Write `content` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("Failed to write fixture file");
}

/// Populate `dir` with the ESCO-style fixture tables
pub fn write_esco_fixture(dir: &Path) {
    write_file(dir, "skills.csv", SKILLS);
    write_file(dir, "skill_hierarchy.csv", HIERARCHY);
    write_file(dir, "skill_groups.csv", GROUPS);
}
