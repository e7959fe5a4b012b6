//! Parsing of `svn --xml` output into typed records.
//!
//! # Public API
//! - [`parse_status`]: `svn status --xml` into unstaged changes and a [`StagingSet`]
//! - [`parse_log`]: `svn log --xml --verbose` into [`LogEntry`] records
//! - [`parse_up_to_date`]: `svn status -u --xml` into an up-to-date verdict
//! - [`normalize_path`] / [`relative_to_root`]: lexical path handling for entry paths
//!
//! Status entry paths are made relative to the working-copy root at parse time. An
//! entry outside the root is an error rather than something to skip: it means svn
//! was run against a different target than the one configured.

use crate::core::error::{Result, SvnNavigatorError};
use crate::core::state::{ChangeEntry, LogEntry, StagingSet, STAGED_CHANGELIST};
use crate::core::svn_status::SvnStatus;
use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};
use std::path::{Component, Path, PathBuf};

/// Parsed `svn status --xml` output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStatus {
    pub unstaged: Vec<ChangeEntry>,
    pub staging: StagingSet,
}

/// Lexically normalize a path: drop `.` components and resolve `..` against
/// preceding components. Does not touch the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Strip `root` from an absolute entry path reported by svn
pub fn relative_to_root(path: &str, root: &Path) -> Result<PathBuf> {
    let normalized = normalize_path(Path::new(path));
    normalized
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| SvnNavigatorError::path_mismatch(path, root))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).map(|n| n.text().unwrap_or_default().to_string())
}

/// Status of one `<entry>`; `None` when svn reports nothing worth listing
fn entry_status(entry: Node<'_, '_>) -> Result<Option<SvnStatus>> {
    let Some(wc_status) = child(entry, "wc-status") else {
        return Ok(None);
    };
    let item = wc_status.attribute("item").unwrap_or("none");
    SvnStatus::from_wc_status(item, wc_status.attribute("props"))
}

/// Parse `svn status --xml <root>`.
///
/// `is_dir` is asked about added entries (with their absolute path) to classify
/// newly added directories, which are kept apart from ordinary changes. Members of
/// the `staged` changelist are staged whatever their status; changelist membership
/// wins over the added-directory classification.
pub fn parse_status(
    xml: &str,
    root: &Path,
    hide_unversioned: bool,
    is_dir: impl Fn(&Path) -> bool,
) -> Result<ParsedStatus> {
    let doc = Document::parse(xml)?;
    let status = doc.root_element();

    let mut unstaged = Vec::new();
    let mut added_directories = Vec::new();
    for target in status.children().filter(|n| n.has_tag_name("target")) {
        for entry in target.children().filter(|n| n.has_tag_name("entry")) {
            let raw_path = entry.attribute("path").unwrap_or_default();
            let path = relative_to_root(raw_path, root)?;
            let Some(code) = entry_status(entry)? else {
                continue;
            };

            if code == SvnStatus::Added && is_dir(&root.join(&path)) {
                added_directories.push(ChangeEntry::new(code, path));
                continue;
            }
            if hide_unversioned && code == SvnStatus::Unversioned {
                continue;
            }
            unstaged.push(ChangeEntry::new(code, path));
        }
    }

    let mut staged = Vec::new();
    for changelist in status
        .children()
        .filter(|n| n.has_tag_name("changelist"))
        .filter(|n| n.attribute("name") == Some(STAGED_CHANGELIST))
    {
        for entry in changelist.children().filter(|n| n.has_tag_name("entry")) {
            let raw_path = entry.attribute("path").unwrap_or_default();
            let path = relative_to_root(raw_path, root)?;
            let code = entry_status(entry)?.unwrap_or(SvnStatus::Normal);
            staged.push(ChangeEntry::new(code, path));
        }
    }

    Ok(ParsedStatus {
        unstaged,
        staging: StagingSet::new(staged, added_directories),
    })
}

fn parse_revision(value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(revision) if revision > 0 => Ok(revision),
        _ => Err(SvnNavigatorError::invalid_revision(value)),
    }
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| SvnNavigatorError::invalid_date(value, e))
}

/// Parse `svn log --xml --verbose`. Entries keep svn's order (newest first for the
/// default range). An entry without a `<paths>` list gets no touched paths.
pub fn parse_log(xml: &str) -> Result<Vec<LogEntry>> {
    let doc = Document::parse(xml)?;
    let mut entries: Vec<LogEntry> = Vec::new();

    for log_entry in doc.descendants().filter(|n| n.has_tag_name("logentry")) {
        let revision = parse_revision(log_entry.attribute("revision").unwrap_or_default())?;
        if entries.iter().any(|e| e.revision == revision) {
            log::warn!("Duplicate revision r{revision} in log output, keeping the first");
            continue;
        }

        let date = match child_text(log_entry, "date") {
            Some(text) if !text.is_empty() => Some(parse_date(&text)?),
            _ => None,
        };

        let mut touched_paths = Vec::new();
        if let Some(paths) = child(log_entry, "paths") {
            for path in paths.children().filter(|n| n.has_tag_name("path")) {
                let action = SvnStatus::from_code(path.attribute("action").unwrap_or_default())?;
                touched_paths.push(ChangeEntry::new(action, path.text().unwrap_or_default()));
            }
        }

        entries.push(LogEntry {
            revision,
            author: child_text(log_entry, "author").unwrap_or_default(),
            date,
            message: child_text(log_entry, "msg").unwrap_or_default(),
            touched_paths,
        });
    }

    Ok(entries)
}

/// Parse `svn status -u --xml`. False when any entry's working revision is older
/// than the `<against>` head revision. Without an `<against>` node the server was
/// not consulted and the working copy counts as up to date.
pub fn parse_up_to_date(xml: &str) -> Result<bool> {
    let doc = Document::parse(xml)?;

    let Some(against) = doc.descendants().find(|n| n.has_tag_name("against")) else {
        return Ok(true);
    };
    // an empty repository reports head revision 0
    let raw_head = against.attribute("revision").unwrap_or_default();
    let head = raw_head
        .parse::<u32>()
        .map_err(|_| SvnNavigatorError::invalid_revision(raw_head))?;

    // added items carry no (or a negative) working revision and are skipped
    let behind = doc
        .descendants()
        .filter(|n| n.has_tag_name("entry"))
        .filter_map(|entry| child(entry, "wc-status"))
        .filter_map(|wc_status| wc_status.attribute("revision"))
        .filter_map(|revision| revision.parse::<u32>().ok())
        .any(|revision| revision < head);

    Ok(!behind)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/home/dev/wc";

    fn no_dirs(_: &Path) -> bool {
        false
    }

    fn status_xml(target_entries: &str, changelists: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<status>
<target path="{ROOT}">
{target_entries}
</target>
{changelists}
</status>"#
        )
    }

    fn entry(path: &str, item: &str) -> String {
        format!(
            r#"<entry path="{path}"><wc-status item="{item}" props="none" revision="4"></wc-status></entry>"#
        )
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c/")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_relative_to_root() {
        let root = Path::new(ROOT);
        assert_eq!(
            relative_to_root("/home/dev/wc/src/main.c", root).unwrap(),
            PathBuf::from("src/main.c")
        );
        assert_eq!(
            relative_to_root("/home/dev/wc/./src/../README", root).unwrap(),
            PathBuf::from("README")
        );
        assert!(relative_to_root("/home/dev/wc2/file", root).is_err());
        assert!(relative_to_root("/elsewhere/file", root).is_err());
    }

    #[test]
    fn test_parse_status_splits_unstaged_and_staged() {
        let xml = status_xml(
            &[
                entry("/home/dev/wc/a.txt", "modified"),
                entry("/home/dev/wc/b.txt", "deleted"),
            ]
            .join("\n"),
            &format!(
                r#"<changelist name="staged">{}</changelist>"#,
                entry("/home/dev/wc/c.txt", "modified")
            ),
        );

        let parsed = parse_status(&xml, Path::new(ROOT), true, no_dirs).unwrap();
        assert_eq!(
            parsed.unstaged,
            vec![
                ChangeEntry::new(SvnStatus::Modified, "a.txt"),
                ChangeEntry::new(SvnStatus::Deleted, "b.txt"),
            ]
        );
        assert_eq!(
            parsed.staging.changes(),
            &[ChangeEntry::new(SvnStatus::Modified, "c.txt")]
        );
        assert!(parsed.staging.added_directories().is_empty());
    }

    #[test]
    fn test_paths_round_trip_against_root() {
        let absolute = [
            "/home/dev/wc/a.txt",
            "/home/dev/wc/deep/nested/file.rs",
            "/home/dev/wc/with space.txt",
        ];
        let xml = status_xml(
            &absolute
                .iter()
                .map(|p| entry(p, "modified"))
                .collect::<Vec<_>>()
                .join("\n"),
            "",
        );
        let parsed = parse_status(&xml, Path::new(ROOT), true, no_dirs).unwrap();

        for (change, original) in parsed.unstaged.iter().zip(absolute) {
            assert!(change.path.is_relative());
            assert!(!change.path.starts_with(ROOT));
            assert_eq!(Path::new(ROOT).join(&change.path), PathBuf::from(original));
        }
    }

    #[test]
    fn test_entry_outside_root_fails() {
        let xml = status_xml(&entry("/tmp/other/a.txt", "modified"), "");
        let err = parse_status(&xml, Path::new(ROOT), true, no_dirs).unwrap_err();
        assert!(matches!(err, SvnNavigatorError::PathMismatch { .. }));
    }

    #[test]
    fn test_added_directory_is_kept_apart() {
        let xml = status_xml(
            &[
                entry("/home/dev/wc/newdir", "added"),
                entry("/home/dev/wc/new.txt", "added"),
            ]
            .join("\n"),
            "",
        );
        let is_dir = |p: &Path| p == Path::new("/home/dev/wc/newdir");

        let parsed = parse_status(&xml, Path::new(ROOT), true, is_dir).unwrap();
        assert_eq!(
            parsed.staging.added_directories(),
            &[ChangeEntry::new(SvnStatus::Added, "newdir")]
        );
        assert_eq!(
            parsed.unstaged,
            vec![ChangeEntry::new(SvnStatus::Added, "new.txt")]
        );
    }

    #[test]
    fn test_staged_added_entry_is_not_an_added_directory() {
        let xml = status_xml(
            "",
            &format!(
                r#"<changelist name="staged">{}</changelist>"#,
                entry("/home/dev/wc/pkg", "added")
            ),
        );
        let parsed = parse_status(&xml, Path::new(ROOT), true, |_| true).unwrap();
        assert!(parsed.staging.added_directories().is_empty());
        assert_eq!(
            parsed.staging.changes(),
            &[ChangeEntry::new(SvnStatus::Added, "pkg")]
        );
    }

    #[test]
    fn test_hide_unversioned() {
        let xml = status_xml(
            &[
                entry("/home/dev/wc/a.txt", "modified"),
                entry("/home/dev/wc/scratch.log", "unversioned"),
            ]
            .join("\n"),
            "",
        );
        let hidden = parse_status(&xml, Path::new(ROOT), true, no_dirs).unwrap();
        assert_eq!(hidden.unstaged.len(), 1);

        let shown = parse_status(&xml, Path::new(ROOT), false, no_dirs).unwrap();
        assert_eq!(
            shown.unstaged[1],
            ChangeEntry::new(SvnStatus::Unversioned, "scratch.log")
        );
    }

    #[test]
    fn test_other_changelists_are_ignored() {
        let xml = status_xml(
            "",
            &format!(
                r#"<changelist name="later">{}</changelist>"#,
                entry("/home/dev/wc/x.txt", "modified")
            ),
        );
        let parsed = parse_status(&xml, Path::new(ROOT), true, no_dirs).unwrap();
        assert!(parsed.unstaged.is_empty());
        assert!(parsed.staging.is_empty());
    }

    #[test]
    fn test_changelist_member_without_changes_is_normal() {
        let xml = status_xml(
            "",
            &format!(
                r#"<changelist name="staged">{}</changelist>"#,
                entry("/home/dev/wc/same.txt", "normal")
            ),
        );
        let parsed = parse_status(&xml, Path::new(ROOT), true, no_dirs).unwrap();
        assert_eq!(parsed.staging.changes()[0].status, SvnStatus::Normal);
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_status("<status><target", Path::new(ROOT), true, no_dirs).unwrap_err();
        assert!(matches!(err, SvnNavigatorError::Xml(_)));
    }

    const LOG_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<log>
<logentry revision="12">
<author>alice</author>
<date>2024-05-02T09:15:30.123456Z</date>
<paths>
<path action="M" prop-mods="false" text-mods="true" kind="file">/trunk/src/main.c</path>
<path action="A" prop-mods="false" text-mods="true" kind="file">/trunk/src/util.c</path>
</paths>
<msg>Split helpers out of main

Details here.</msg>
</logentry>
<logentry revision="11">
<author>bob</author>
<date>2024-05-01T08:00:00.000000Z</date>
<msg>Initial import</msg>
</logentry>
</log>"#;

    #[test]
    fn test_parse_log() {
        let entries = parse_log(LOG_XML).unwrap();
        assert_eq!(entries.len(), 2);

        let newest = &entries[0];
        assert_eq!(newest.revision, 12);
        assert_eq!(newest.author, "alice");
        assert_eq!(newest.summary(), "Split helpers out of main");
        assert_eq!(newest.short_date(), "2024-05-02");
        assert_eq!(
            newest.touched_paths,
            vec![
                ChangeEntry::new(SvnStatus::Modified, "/trunk/src/main.c"),
                ChangeEntry::new(SvnStatus::Added, "/trunk/src/util.c"),
            ]
        );

        // no <paths> element is not an error
        assert!(entries[1].touched_paths.is_empty());
    }

    #[test]
    fn test_parse_log_missing_author_and_date() {
        let xml = r#"<log><logentry revision="3"><msg></msg></logentry></log>"#;
        let entries = parse_log(xml).unwrap();
        assert_eq!(entries[0].author, "");
        assert_eq!(entries[0].date, None);
        assert_eq!(entries[0].message, "");
    }

    #[test]
    fn test_parse_log_skips_duplicate_revisions() {
        let xml = r#"<log>
<logentry revision="5"><msg>first</msg></logentry>
<logentry revision="5"><msg>again</msg></logentry>
</log>"#;
        let entries = parse_log(xml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "first");
    }

    #[test]
    fn test_parse_log_rejects_bad_revision() {
        let xml = r#"<log><logentry revision="abc"></logentry></log>"#;
        assert!(matches!(
            parse_log(xml),
            Err(SvnNavigatorError::InvalidRevision { .. })
        ));
    }

    #[test]
    fn test_up_to_date_without_against_is_optimistic() {
        let xml = status_xml(&entry("/home/dev/wc/a.txt", "modified"), "");
        assert!(parse_up_to_date(&xml).unwrap());
    }

    #[test]
    fn test_up_to_date_compares_against_head() {
        let current = r#"<status><target path="/wc">
<entry path="/wc/a"><wc-status item="modified" revision="9"></wc-status></entry>
<against revision="9"/>
</target></status>"#;
        assert!(parse_up_to_date(current).unwrap());

        let behind = r#"<status><target path="/wc">
<entry path="/wc/a"><wc-status item="modified" revision="9"></wc-status></entry>
<entry path="/wc/b"><wc-status item="normal" revision="7"></wc-status></entry>
<against revision="9"/>
</target></status>"#;
        assert!(!parse_up_to_date(behind).unwrap());
    }

    #[test]
    fn test_up_to_date_ignores_entries_without_revision() {
        let xml = r#"<status><target path="/wc">
<entry path="/wc/new"><wc-status item="unversioned"></wc-status></entry>
<entry path="/wc/added"><wc-status item="added" revision="-1"></wc-status></entry>
<against revision="3"/>
</target></status>"#;
        assert!(parse_up_to_date(xml).unwrap());
    }

    #[test]
    fn test_up_to_date_in_empty_repository() {
        let xml = r#"<status><target path="/wc">
<entry path="/wc/new"><wc-status item="unversioned"></wc-status></entry>
<against revision="0"/>
</target></status>"#;
        assert!(parse_up_to_date(xml).unwrap());

        let garbage = r#"<status><target path="/wc"><against revision="head"/></target></status>"#;
        assert!(matches!(
            parse_up_to_date(garbage),
            Err(SvnNavigatorError::InvalidRevision { .. })
        ));
    }
}
