use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tedit_core::{
    BufferEdit, Capture, ClipboardCommand, Command, Cursor, CursorCommand, EditCommand,
    EditorConfig, EditorContext, KeyCode, KeyInput, Modifiers, Motion, ParseBridge, TextBuffer,
    WrapMode,
};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct EditLog {
    full_parses: usize,
    edits: Vec<BufferEdit>,
    /// Document text reconstructed purely from the reported edits.
    shadow: String,
}

/// Bridge that replays every reported edit onto a shadow copy of the document.
struct RecordingBridge {
    log: Rc<RefCell<EditLog>>,
}

impl ParseBridge for RecordingBridge {
    fn language_name(&self) -> &str {
        "Recording"
    }

    fn parse_buffer(&mut self, buffer: &TextBuffer) {
        let mut log = self.log.borrow_mut();
        log.full_parses += 1;
        log.shadow = buffer.contents();
    }

    fn edit(&mut self, buffer: &TextBuffer, edit: &BufferEdit) {
        let inserted: Vec<u8> = buffer
            .chunks_in_range(edit.start_byte, edit.new_end_byte)
            .concat();
        let inserted = String::from_utf8(inserted).unwrap();

        let mut log = self.log.borrow_mut();
        log.shadow
            .replace_range(edit.start_byte..edit.old_end_byte, &inserted);
        log.edits.push(*edit);
    }

    fn captures_within(&self, buffer: &TextBuffer, start: Cursor, end: Cursor) -> Vec<Capture> {
        (start.row..=end.row.min(buffer.line_count() - 1))
            .filter(|row| !buffer.line_at(*row).is_empty())
            .map(|row| Capture {
                start: Cursor::new(row, 0),
                end: buffer.end_of_line(row),
                tag: "line".to_string(),
            })
            .collect()
    }
}

fn editor_with_bridge(text: &str) -> (EditorContext, Rc<RefCell<EditLog>>) {
    let log = Rc::new(RefCell::new(EditLog::default()));
    let mut editor = EditorContext::with_text(text);
    editor.set_parse_bridge(Box::new(RecordingBridge { log: log.clone() }));
    (editor, log)
}

fn run(editor: &mut EditorContext, command: Command) -> Option<BufferEdit> {
    editor.execute(command)
}

fn mv(motion: Motion) -> Command {
    Command::Cursor(CursorCommand::Move(motion))
}

fn sel(motion: Motion) -> Command {
    Command::Cursor(CursorCommand::Select(motion))
}

fn ed(command: EditCommand) -> Command {
    Command::Edit(command)
}

#[test]
fn test_copy_paste_multiline_selection() {
    let mut editor = EditorContext::with_text("one two\nthree four\nfive");
    editor.set_selection((0, 4), (1, 5));

    run(&mut editor, Command::Clipboard(ClipboardCommand::Copy));
    assert_eq!(editor.clipboard(), &["two".to_string(), "three".to_string()]);
    // copy keeps the selection
    assert!(editor.selection().is_some());

    editor.set_cursor(2, 4);
    run(&mut editor, Command::Clipboard(ClipboardCommand::Paste));
    assert_eq!(
        editor.buffer().view(),
        vec!["one two", "three four", "fivetwo", "three"]
    );
    assert_eq!(editor.cursor(), Cursor::new(3, 5));
}

#[test]
fn test_cut_moves_cursor_to_selection_start() {
    let mut editor = EditorContext::with_text("alpha beta gamma");
    editor.set_selection((0, 11), (0, 6));

    run(&mut editor, Command::Clipboard(ClipboardCommand::Cut));
    assert_eq!(editor.buffer().line_at(0), "alpha gamma");
    assert_eq!(editor.cursor(), Cursor::new(0, 6));
    assert_eq!(editor.anchor(), None);
    assert_eq!(editor.clipboard(), &["beta ".to_string()]);

    // cut without a selection does nothing
    assert_eq!(
        run(&mut editor, Command::Clipboard(ClipboardCommand::Cut)),
        None
    );
    assert_eq!(editor.clipboard(), &["beta ".to_string()]);
}

#[test]
fn test_paste_replaces_selection() {
    let mut editor = EditorContext::with_text("keep [old] keep");
    editor.set_clipboard(vec!["new".to_string()]);
    editor.set_selection((0, 6), (0, 9));

    run(&mut editor, Command::Clipboard(ClipboardCommand::Paste));
    assert_eq!(editor.buffer().line_at(0), "keep [new] keep");
    assert_eq!(editor.cursor(), Cursor::new(0, 9));
}

#[test]
fn test_newline_and_delete_over_selection() {
    let mut editor = EditorContext::with_text("abcdef");
    editor.set_selection((0, 2), (0, 4));
    run(&mut editor, ed(EditCommand::InsertNewline));
    assert_eq!(editor.buffer().view(), vec!["ab", "ef"]);
    assert_eq!(editor.cursor(), Cursor::new(1, 0));

    editor.set_selection((0, 1), (1, 1));
    run(&mut editor, ed(EditCommand::Delete));
    assert_eq!(editor.buffer().view(), vec!["af"]);
    assert_eq!(editor.cursor(), Cursor::new(0, 1));
}

#[test]
fn test_word_deletion() {
    let mut editor = EditorContext::with_text("let value = 42;");
    editor.set_cursor(0, 9);
    run(&mut editor, ed(EditCommand::DeleteWordLeft));
    assert_eq!(editor.buffer().line_at(0), "let  = 42;");
    assert_eq!(editor.cursor(), Cursor::new(0, 4));

    run(&mut editor, ed(EditCommand::DeleteWordRight));
    assert_eq!(editor.buffer().line_at(0), "let = 42;");
    assert_eq!(editor.cursor(), Cursor::new(0, 4));

    editor.set_selection((0, 0), (0, 4));
    run(&mut editor, ed(EditCommand::DeleteWordRight));
    assert_eq!(editor.buffer().line_at(0), "= 42;");
}

#[test]
fn test_shift_selected_block_down_and_up() {
    let mut editor = EditorContext::with_text("a\nb\nc\nd");
    editor.set_selection((0, 0), (1, 1));

    run(&mut editor, ed(EditCommand::ShiftLinesDown));
    assert_eq!(editor.buffer().view(), vec!["c", "a", "b", "d"]);
    assert_eq!(editor.anchor(), Some(Cursor::new(1, 0)));
    assert_eq!(editor.cursor(), Cursor::new(2, 1));

    run(&mut editor, ed(EditCommand::ShiftLinesDown));
    assert_eq!(editor.buffer().view(), vec!["c", "d", "a", "b"]);

    // block already touches the last line
    assert_eq!(run(&mut editor, ed(EditCommand::ShiftLinesDown)), None);

    run(&mut editor, ed(EditCommand::ShiftLinesUp));
    assert_eq!(editor.buffer().view(), vec!["c", "a", "b", "d"]);
    assert_eq!(editor.selection(), Some((Cursor::new(1, 0), Cursor::new(2, 1))));
}

#[test]
fn test_vertical_move_with_selection_collapses_then_moves() {
    let mut editor = EditorContext::with_text("aaaa\nbbbb\ncccc");
    editor.set_selection((1, 1), (1, 3));
    run(&mut editor, mv(Motion::Up));
    assert_eq!(editor.cursor(), Cursor::new(0, 1));
    assert_eq!(editor.anchor(), None);

    editor.set_selection((1, 1), (1, 3));
    run(&mut editor, mv(Motion::Down));
    assert_eq!(editor.cursor(), Cursor::new(2, 3));
}

#[test]
fn test_shift_word_selection_extends_from_anchor() {
    let mut editor = EditorContext::with_text("foo bar baz");
    run(&mut editor, sel(Motion::WordRight));
    run(&mut editor, sel(Motion::WordRight));
    assert_eq!(
        editor.selection(),
        Some((Cursor::new(0, 0), Cursor::new(0, 4)))
    );

    run(&mut editor, mv(Motion::WordRight));
    assert_eq!(editor.anchor(), None);
    assert_eq!(editor.cursor(), Cursor::new(0, 7));
}

#[test]
fn test_key_input_drives_editor() {
    let mut editor = EditorContext::new(EditorConfig {
        wrap_mode: WrapMode::NoWrap,
        viewport_columns: 80,
    });

    for ch in "fn x".chars() {
        editor.handle_key(KeyInput::plain(KeyCode::Char(ch)));
    }
    editor.handle_key(KeyInput::plain(KeyCode::Enter));
    editor.handle_key(KeyInput::plain(KeyCode::Tab));
    editor.handle_key(KeyInput::plain(KeyCode::Char('y')));
    assert_eq!(editor.buffer().view(), vec!["fn x", "\ty"]);
    assert_eq!(editor.cursor().effective_col, 5);

    editor.handle_key(KeyInput::new(KeyCode::Left, Modifiers::CTRL_SHIFT));
    assert_eq!(editor.selection(), Some((Cursor::new(1, 1), Cursor::new(1, 2))));
    editor.handle_key(KeyInput::new(KeyCode::Char('c'), Modifiers::CTRL));
    assert_eq!(editor.clipboard(), &["y".to_string()]);

    editor.handle_key(KeyInput::new(KeyCode::Up, Modifiers::ALT));
    assert_eq!(editor.buffer().view(), vec!["\ty", "fn x"]);

    // unbound: nothing changes
    assert_eq!(editor.handle_key(KeyInput::plain(KeyCode::Esc)), None);
    assert_eq!(editor.buffer().view(), vec!["\ty", "fn x"]);
}

#[test]
fn test_bridge_receives_full_parse_on_attach_and_load() {
    let (mut editor, log) = editor_with_bridge("a\nb");
    assert_eq!(log.borrow().full_parses, 1);
    assert_eq!(editor.language_name(), Some("Recording"));

    editor.load_contents("x\ny\nz");
    assert_eq!(log.borrow().full_parses, 2);
    assert_eq!(log.borrow().shadow, "x\ny\nz");
    assert_eq!(editor.cursor(), Cursor::new(0, 0));
}

#[test]
fn test_captures_empty_without_bridge() {
    let mut editor = EditorContext::with_text("text");
    assert!(
        editor
            .captures_within(Cursor::new(0, 0), Cursor::new(0, 4))
            .is_empty()
    );

    let (with_bridge, _log) = editor_with_bridge("a\n\nb");
    let captures = with_bridge.captures_within(Cursor::new(0, 0), Cursor::new(2, 1));
    assert_eq!(captures.len(), 2);
    assert_eq!(captures[1].start, Cursor::new(2, 0));

    editor.set_parse_bridge(Box::new(RecordingBridge {
        log: Rc::new(RefCell::new(EditLog::default())),
    }));
    assert!(editor.clear_parse_bridge().is_some());
    assert_eq!(editor.language_name(), None);
}

#[test]
fn test_reported_edits_reproduce_document() {
    init_tracing();
    let (mut editor, log) = editor_with_bridge("fn main() {\n    body();\n}");
    let mut rng = StdRng::seed_from_u64(2024);

    let commands = [
        mv(Motion::Left),
        mv(Motion::Right),
        mv(Motion::Up),
        mv(Motion::Down),
        mv(Motion::WordLeft),
        mv(Motion::WordRight),
        sel(Motion::Left),
        sel(Motion::Right),
        sel(Motion::Up),
        sel(Motion::Down),
        sel(Motion::WordRight),
        ed(EditCommand::InsertChar('x')),
        ed(EditCommand::InsertChar('\t')),
        ed(EditCommand::InsertChar(' ')),
        ed(EditCommand::InsertNewline),
        ed(EditCommand::InsertText("a\nbc".to_string())),
        ed(EditCommand::Backspace),
        ed(EditCommand::Delete),
        ed(EditCommand::DeleteWordLeft),
        ed(EditCommand::DeleteWordRight),
        ed(EditCommand::ShiftLinesUp),
        ed(EditCommand::ShiftLinesDown),
        Command::Clipboard(ClipboardCommand::Copy),
        Command::Clipboard(ClipboardCommand::Cut),
        Command::Clipboard(ClipboardCommand::Paste),
    ];

    for _ in 0..1500 {
        let command = commands[rng.gen_range(0..commands.len())].clone();
        let reported = run(&mut editor, command);

        let log = log.borrow();
        assert_eq!(log.shadow, editor.buffer().contents());
        if let Some(edit) = reported {
            assert_eq!(log.edits.last(), Some(&edit));
            assert!(edit.start_point <= edit.old_end_point);
            assert!(edit.start_point <= edit.new_end_point);
        }

        let cursor = editor.cursor();
        assert!(cursor.row < editor.buffer().line_count());
        assert!(cursor.col <= editor.buffer().line_at(cursor.row).len());
        assert_eq!(
            editor.buffer().cursor_at(cursor.row, cursor.col).effective_col,
            cursor.effective_col
        );
    }
}
