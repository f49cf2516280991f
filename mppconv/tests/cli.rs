use std::ffi::OsStr;
use std::io::{Cursor, Write};
use std::process::{Command, Output};

fn mppconv(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mppconv"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run mppconv")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

const MSPDI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Project xmlns="http://schemas.microsoft.com/project">
  <Name>Release</Name>
  <Tasks>
    <Task>
      <UID>1</UID>
      <ID>1</ID>
      <Name>Build</Name>
      <Start>2024-05-06T08:00:00</Start>
      <Finish>2024-05-06T17:00:00</Finish>
      <Duration>PT8H0M0S</Duration>
      <DurationFormat>7</DurationFormat>
    </Task>
    <Task>
      <UID>2</UID>
      <ID>2</ID>
      <Name>Ship</Name>
      <PredecessorLink>
        <PredecessorUID>1</PredecessorUID>
        <Type>1</Type>
      </PredecessorLink>
    </Task>
  </Tasks>
</Project>
"#;

#[test]
fn no_arguments_is_usage_error() {
    let out = mppconv(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage"), "{}", stderr(&out));
    assert!(out.stdout.is_empty());
}

#[test]
fn two_arguments_is_usage_error() {
    let out = mppconv(&[OsStr::new("a.mpp"), OsStr::new("b.mpp")]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage"), "{}", stderr(&out));
    assert!(out.stdout.is_empty());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.mpp");

    let out = mppconv(&[path.as_os_str()]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("Error converting file"), "{err}");
    assert!(err.contains(&path.display().to_string()), "{err}");
    assert!(out.stdout.is_empty());
}

#[test]
fn unknown_format_fails_without_output() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"Name,Start\nBuild,2024-05-06\n").unwrap();

    let out = mppconv(&[f.path().as_os_str()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Unsupported file format"));
    assert!(out.stdout.is_empty());
}

#[test]
fn converts_mspdi_to_stdout() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(MSPDI.as_bytes()).unwrap();

    let out = mppconv(&[f.path().as_os_str()]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert!(out.stderr.is_empty(), "{}", stderr(&out));

    let xml = String::from_utf8(out.stdout).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<Name>Release</Name>"));
    assert!(xml.contains("<PredecessorUID>1</PredecessorUID>"));
    assert!(xml.trim_end().ends_with("</Project>"));
}

#[test]
fn converts_mpp_container() {
    let mut comp = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    comp.create_storage("/   114").unwrap();
    {
        let mut s = comp.create_stream("/\u{1}CompObj").unwrap();
        let mut data = vec![0u8; 28];
        for text in ["Microsoft Project", "MSProject.MPP14"] {
            data.extend_from_slice(&((text.len() + 1) as u32).to_le_bytes());
            data.extend_from_slice(text.as_bytes());
            data.push(0);
        }
        s.write_all(&data).unwrap();
    }
    comp.flush().unwrap();
    let bytes = comp.into_inner().into_inner();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Roadmap.mpp");
    std::fs::write(&path, bytes).unwrap();

    let out = mppconv(&[path.as_os_str()]);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert!(out.stderr.is_empty(), "{}", stderr(&out));

    let xml = String::from_utf8(out.stdout).unwrap();
    assert!(xml.contains("<Name>Roadmap</Name>"));
    assert!(xml.contains("<Calendars>"));
}

#[test]
fn help_exits_successfully() {
    let out = mppconv(&[OsStr::new("--help")]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("INPUT_MPP_FILE"));
}
