//! Canned `svn --xml` output for integration tests
//!
//! Entry paths are absolute, built from the working-copy root, the way svn prints
//! them when given an absolute target.

#![allow(dead_code)]

/// One `<entry>` with a `wc-status` item
pub fn entry(root: &str, path: &str, item: &str) -> String {
    format!(
        r#"<entry path="{root}/{path}"><wc-status item="{item}" revision="7" props="none"><commit revision="7"><author>alice</author><date>2024-03-01T10:00:00.000000Z</date></commit></wc-status></entry>"#
    )
}

/// `svn status --xml` with the given target entries and `staged` changelist entries
pub fn status_xml(root: &str, target: &[(&str, &str)], staged: &[(&str, &str)]) -> String {
    let target_entries: String = target
        .iter()
        .map(|(path, item)| entry(root, path, item))
        .collect();
    let staged_entries: String = staged
        .iter()
        .map(|(path, item)| entry(root, path, item))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<status>
<target path="{root}">{target_entries}</target>
<changelist name="staged">{staged_entries}</changelist>
</status>
"#
    )
}

/// `svn status -u --xml` where every entry is at `working` and the server is at `head`
pub fn status_u_xml(root: &str, working: u32, head: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<status>
<target path="{root}">
<entry path="{root}/README"><wc-status item="normal" revision="{working}" props="none"/></entry>
<against revision="{head}"/>
</target>
</status>
"#
    )
}

pub struct Revision<'a> {
    pub number: u32,
    pub author: &'a str,
    pub date: &'a str,
    pub message: &'a str,
    pub paths: &'a [(&'a str, &'a str)],
}

/// `svn log --xml --verbose`
pub fn log_xml(revisions: &[Revision<'_>]) -> String {
    let entries: String = revisions
        .iter()
        .map(|rev| {
            let paths: String = rev
                .paths
                .iter()
                .map(|(action, path)| {
                    format!(r#"<path kind="file" action="{action}">{path}</path>"#)
                })
                .collect();
            format!(
                r#"<logentry revision="{}"><author>{}</author><date>{}</date><paths>{paths}</paths><msg>{}</msg></logentry>"#,
                rev.number, rev.author, rev.date, rev.message
            )
        })
        .collect();
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<log>\n{entries}\n</log>\n")
}

/// Two revisions on trunk, newest first
pub fn sample_log() -> String {
    log_xml(&[
        Revision {
            number: 12,
            author: "alice",
            date: "2024-03-01T10:00:00.000000Z",
            message: "Fix parser\n\nHandles empty input now",
            paths: &[("M", "/trunk/src/parser.c")],
        },
        Revision {
            number: 11,
            author: "bob",
            date: "2024-02-28T09:30:00.000000Z",
            message: "Add README",
            paths: &[("A", "/trunk/README")],
        },
    ])
}
