mod common;

use blkdump_lib::progress::{NoOpProgressCallback, ProgressCallback, ProgressId, ProgressInfo};
use blkdump_lib::{DumpOptions, Error, HexMode, MonitorPort, PortConfig, dump};
use common::{Event, ScriptedMonitor, hex_reply};
use std::io::{Cursor, Read, Write};
use std::sync::Mutex;

#[test]
fn test_dump_three_bytes_end_to_end() {
    let mut monitor = ScriptedMonitor::new(b"deadbeef>>");
    let mut out = Vec::new();

    let n = dump(
        &mut monitor,
        0x03,
        &mut out,
        &DumpOptions::default(),
        &NoOpProgressCallback,
    )
    .unwrap();

    assert_eq!(n, 3);
    assert_eq!(out, vec![0xDE, 0xAD, 0xBE]);
    assert_eq!(
        monitor.commands(),
        vec![
            Event::Literal("i=0".to_string()),
            Event::Formatted("while i<0x0003 getb:puth a:i=i+1".to_string()),
        ]
    );
    // "ef" was taken as the prompt
    assert_eq!(monitor.consumed(), 8);
    assert_eq!(monitor.remaining(), b">>");
}

#[test]
fn test_dump_zero_count_touches_nothing() {
    let mut monitor = ScriptedMonitor::new(b"00> ");
    let mut out = Vec::new();

    let n = dump(
        &mut monitor,
        0,
        &mut out,
        &DumpOptions::default(),
        &NoOpProgressCallback,
    )
    .unwrap();

    assert_eq!(n, 0);
    assert!(out.is_empty());
    assert!(monitor.log().borrow().is_empty());
    assert_eq!(monitor.consumed(), 0);
}

#[test]
fn test_dump_rejects_count_beyond_loop_limit() {
    let mut monitor = ScriptedMonitor::new(b"");
    let mut out = Vec::new();

    let err = dump(
        &mut monitor,
        0x10000,
        &mut out,
        &DumpOptions::default(),
        &NoOpProgressCallback,
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(monitor.commands().is_empty());
}

#[test]
fn test_dump_lenient_option_is_forwarded() {
    let mut monitor = ScriptedMonitor::new(b"q1> ");
    let mut out = Vec::new();
    let options = DumpOptions {
        hex_mode: HexMode::Lenient,
    };

    dump(&mut monitor, 1, &mut out, &options, &NoOpProgressCallback).unwrap();
    assert_eq!(out, vec![0x00]);
}

#[derive(Default)]
struct CountingProgress {
    total: Mutex<u64>,
    done: Mutex<u64>,
    finished: Mutex<Option<String>>,
}

impl ProgressCallback for CountingProgress {
    fn start(&self, info: ProgressInfo) -> ProgressId {
        *self.total.lock().unwrap() = info.total;
        ProgressId(7)
    }

    fn increment(&self, id: ProgressId, delta: u64) {
        assert_eq!(id, ProgressId(7));
        *self.done.lock().unwrap() += delta;
    }

    fn finish(&self, _id: ProgressId, final_message: String) {
        *self.finished.lock().unwrap() = Some(final_message);
    }
}

#[test]
fn test_dump_reports_progress() {
    let data: Vec<u8> = (0..=255).collect();
    let mut monitor = ScriptedMonitor::new(&hex_reply(&data, b"> "));
    let mut out = Vec::new();
    let progress = CountingProgress::default();

    dump(&mut monitor, 256, &mut out, &DumpOptions::default(), &progress).unwrap();

    assert_eq!(out, data);
    assert_eq!(*progress.total.lock().unwrap(), 256);
    assert_eq!(*progress.done.lock().unwrap(), 256);
    assert!(progress.finished.lock().unwrap().is_some());
}

/// Byte-level console: replays a reply and captures writes.
struct Console {
    reply: Cursor<Vec<u8>>,
    written: Vec<u8>,
}

impl Read for Console {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reply.read(buf)
    }
}

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_dump_over_echoing_console() {
    let mut reply = b"i=0\r\n> while i<0x0002 getb:puth a:i=i+1\r\n".to_vec();
    reply.extend_from_slice(&hex_reply(&[0x55, 0xAA], b"> "));
    let console = Console {
        reply: Cursor::new(reply.clone()),
        written: Vec::new(),
    };
    let config = PortConfig {
        prompt: Some(*b"> "),
        ..PortConfig::default()
    };
    let mut port = MonitorPort::new(console, config);
    let mut out = Vec::new();

    dump(
        &mut port,
        2,
        &mut out,
        &DumpOptions::default(),
        &NoOpProgressCallback,
    )
    .unwrap();

    assert_eq!(out, vec![0x55, 0xAA]);
    let console = port.into_inner();
    assert_eq!(
        console.written,
        b"i=0\rwhile i<0x0002 getb:puth a:i=i+1\r".to_vec()
    );
    assert_eq!(console.reply.position() as usize, reply.len());
}

#[test]
fn test_dump_over_silent_console() {
    let console = Console {
        reply: Cursor::new(b"> 0102> ".to_vec()),
        written: Vec::new(),
    };
    let config = PortConfig {
        echo: false,
        ..PortConfig::default()
    };
    let mut port = MonitorPort::new(console, config);
    let mut out = Vec::new();

    dump(
        &mut port,
        2,
        &mut out,
        &DumpOptions::default(),
        &NoOpProgressCallback,
    )
    .unwrap();

    assert_eq!(out, vec![0x01, 0x02]);
}
