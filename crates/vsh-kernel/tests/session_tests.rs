//! End-to-end sessions against a kernel built from an XML document.

use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use vsh_kernel::{CommandSource, ExecResult, Identity, Kernel, KernelConfig};

const DOCS_VFS: &str = r#"<dir><dir name="docs"><file name="readme">hello</file></dir></dir>"#;

fn write_vfs(tag: &str, xml: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("vsh-session-{}-{}.xml", std::process::id(), tag));
    fs::write(&path, xml).expect("write vfs");
    path
}

fn kernel_from(tag: &str, xml: &str) -> Kernel {
    let path = write_vfs(tag, xml);
    let kernel = Kernel::new(
        KernelConfig::default()
            .with_vfs(&path)
            .with_identity(Identity::new("amy", "box")),
    );
    let _ = fs::remove_file(&path);
    kernel
}

async fn run(kernel: &Kernel, line: &str) -> ExecResult {
    kernel
        .execute(line, CommandSource::Interactive)
        .await
        .expect("non-blank line")
}

#[tokio::test]
async fn test_docs_readme_walkthrough() {
    let kernel = kernel_from("docs", DOCS_VFS);
    assert!(kernel.diagnostics().is_empty());

    let cd = run(&kernel, "cd docs").await;
    assert!(cd.ok());
    assert_eq!(cd.display(), "");
    assert_eq!(kernel.cwd().await, "~/docs");

    let cat = run(&kernel, "cat readme").await;
    assert_eq!(cat.out, "hello\n");

    let missing = run(&kernel, "cd nope").await;
    assert!(!missing.ok());
    assert_eq!(missing.err, "Err: No such directory 'nope'");
    assert_eq!(kernel.cwd().await, "~/docs");
}

#[tokio::test]
async fn test_cd_with_two_args_keeps_cwd() {
    let kernel = kernel_from("two-args", DOCS_VFS);
    let result = run(&kernel, "cd a b").await;
    assert_eq!(result.err, "Err: Illegal args for 'cd' (1 required)");
    assert_eq!(kernel.cwd().await, "~");
}

#[rstest]
#[case::named("docs")]
#[case::dotdot("..")]
#[case::nested("a/b")]
#[tokio::test]
async fn test_empty_vfs(#[case] target: &str) {
    let kernel = Kernel::new(KernelConfig::default().with_identity(Identity::new("amy", "box")));

    assert_eq!(run(&kernel, "ls").await.out, "(empty)\n");

    let cd = run(&kernel, &format!("cd {target}")).await;
    if target == ".." {
        // parent of root is root
        assert!(cd.ok());
    } else {
        assert!(!cd.ok());
    }
    assert_eq!(kernel.cwd().await, "~");
}

#[tokio::test]
async fn test_binary_cat_reports_size() {
    // "AAECAw==" is four bytes
    let kernel = kernel_from(
        "binary",
        r#"<dir><file name="blob" base64="true">AAECAw==</file></dir>"#,
    );
    assert_eq!(run(&kernel, "cat blob").await.out, "<binary file: 4 bytes>\n");
}

#[tokio::test]
async fn test_bad_base64_becomes_empty_binary() {
    let kernel = kernel_from(
        "bad-base64",
        r#"<dir><file name="blob" base64="true">!!not base64!!</file></dir>"#,
    );
    assert!(kernel.diagnostics().is_empty());
    assert_eq!(run(&kernel, "cat blob").await.out, "<binary file: 0 bytes>\n");
}

#[tokio::test]
async fn test_listing_marks_directories() {
    let kernel = kernel_from(
        "listing",
        r#"<dir><file name="zeta">z</file><dir name="alpha"/><file name="motd">hi</file></dir>"#,
    );
    let result = run(&kernel, "ls").await;
    assert_eq!(result.out, "alpha/  motd  zeta\n");
    let listing = result.listing.expect("structured listing");
    assert!(listing[0].is_dir());
    assert_eq!(kernel.motd(), Some("hi"));
}

#[tokio::test]
async fn test_malformed_vfs_falls_back_to_empty_root() {
    let kernel = kernel_from("malformed", "<dir><dir name='x'></dir>");
    assert_eq!(kernel.diagnostics().len(), 1);
    assert!(kernel.diagnostics()[0].starts_with("[VFS ERROR]"));
    assert_eq!(run(&kernel, "ls").await.out, "(empty)\n");
}

#[tokio::test]
async fn test_cat_needs_one_file_in_cwd() {
    let kernel = kernel_from("cat-args", DOCS_VFS);
    assert_eq!(run(&kernel, "cat").await.err, "Usage: cat <file>");
    assert_eq!(run(&kernel, "cat readme").await.err, "Err: No such file 'readme'");
    assert_eq!(run(&kernel, "cat docs").await.err, "Err: No such file 'docs'");
}

#[tokio::test]
async fn test_ls_rejects_arguments() {
    let kernel = kernel_from("ls-args", DOCS_VFS);
    assert_eq!(run(&kernel, "ls docs").await.err, "Err: 'ls' takes no arguments");
}

#[tokio::test]
async fn test_commands_after_exit_still_run() {
    let kernel = kernel_from("exit", DOCS_VFS);
    assert_eq!(run(&kernel, "exit").await.out, "Exiting\n");
    assert!(kernel.exit_scheduled().await);
    assert_eq!(run(&kernel, "echo still here").await.out, "still here\n");
    assert!(kernel.cancel_exit().await);
}

#[tokio::test]
async fn test_name_with_separator_is_listed_but_not_enterable() {
    let kernel = kernel_from(
        "slashed",
        r#"<dir><dir name="a/b"/><dir name="a"><dir name="b"/></dir></dir>"#,
    );
    assert_eq!(run(&kernel, "ls").await.out, "a/  a/b/\n");

    // "a/b" descends through "a", never the entry literally named "a/b"
    assert!(run(&kernel, "cd a/b").await.ok());
    assert_eq!(kernel.cwd().await, "~/a/b");
    assert_eq!(run(&kernel, "ls").await.out, "(empty)\n");
}
