/// Backend không nhận ký tự xuống dòng trong query, nên `\n` được thay bằng marker này.
pub const NEWLINE_MARKER: &str = "%e%";

pub fn encode_body(body: &str) -> String {
    body.replace('\n', NEWLINE_MARKER)
}

pub fn decode_body(wire: &str) -> String {
    wire.replace(NEWLINE_MARKER, "\n")
}
