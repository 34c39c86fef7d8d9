//! Text encoding of the contract (`.prototxt`)
//!
//! A small protobuf-text-format grammar restricted to the contract schema:
//!
//! ```text
//! model_name: "iris"
//! signatures {
//!   signature_name: "predict"
//!   inputs {
//!     name: "features"
//!     shape {
//!       dims: -1
//!       dims: 4
//!     }
//!     dtype: FLOAT64
//!   }
//!   outputs {
//!     name: "species"
//!     dtype: STRING
//!   }
//! }
//! ```
//!
//! `#` starts a comment running to end of line. A colon before an opening
//! brace is accepted but not emitted. [`render`] followed by [`parse`] is
//! lossless for any contract.

use super::{ContractError, DataType, ModelContract, ModelField, ModelSignature, TensorShape};

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Colon,
    LBrace,
    RBrace,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("identifier `{s}`"),
            Token::Str(s) => format!("string {s:?}"),
            Token::Int(n) => format!("integer {n}"),
            Token::Colon => "`:`".to_string(),
            Token::LBrace => "`{`".to_string(),
            Token::RBrace => "`}`".to_string(),
        }
    }
}

fn lex_error(line: usize, message: impl Into<String>) -> ContractError {
    ContractError::Parse {
        line,
        message: message.into(),
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ContractError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                // comment to end of line
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            ':' => {
                tokens.push((Token::Colon, line));
                chars.next();
            }
            '{' => {
                tokens.push((Token::LBrace, line));
                chars.next();
            }
            '}' => {
                tokens.push((Token::RBrace, line));
                chars.next();
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('"') => s.push('"'),
                            Some('\\') => s.push('\\'),
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some(other) => {
                                return Err(lex_error(line, format!("unknown escape \\{other}")))
                            }
                            None => return Err(lex_error(line, "unterminated string")),
                        },
                        Some('\n') | None => return Err(lex_error(line, "unterminated string")),
                        Some(other) => s.push(other),
                    }
                }
                tokens.push((Token::Str(s), line));
            }
            c if c == '-' || c.is_ascii_digit() => {
                let mut s = String::new();
                s.push(c);
                chars.next();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n = s
                    .parse::<i64>()
                    .map_err(|_| lex_error(line, format!("invalid integer `{s}`")))?;
                tokens.push((Token::Int(n), line));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Ident(s), line));
            }
            other => return Err(lex_error(line, format!("unexpected character `{other}`"))),
        }
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map_or(0, |(_, l)| *l)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ContractError {
        ContractError::Parse {
            line: self.line(),
            message: message.into(),
        }
    }

    /// Next token must be a field name.
    fn field_name(&mut self) -> Result<String, ContractError> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(name),
            Some(other) => Err(self.error(format!("expected field name, found {}", other.describe()))),
            None => Err(self.error("expected field name, found end of input")),
        }
    }

    /// Consume `: "value"` after a string-typed field name.
    fn string_value(&mut self) -> Result<String, ContractError> {
        self.expect_colon()?;
        match self.next() {
            Some(Token::Str(s)) => Ok(s),
            Some(other) => Err(self.error(format!("expected string, found {}", other.describe()))),
            None => Err(self.error("expected string, found end of input")),
        }
    }

    /// Consume `: 42` after an integer-typed field name.
    fn int_value(&mut self) -> Result<i64, ContractError> {
        self.expect_colon()?;
        match self.next() {
            Some(Token::Int(n)) => Ok(n),
            Some(other) => Err(self.error(format!("expected integer, found {}", other.describe()))),
            None => Err(self.error("expected integer, found end of input")),
        }
    }

    /// Consume `: NAME` after an enum-typed field name.
    fn enum_value(&mut self) -> Result<String, ContractError> {
        self.expect_colon()?;
        match self.next() {
            Some(Token::Ident(s)) => Ok(s),
            Some(other) => {
                Err(self.error(format!("expected enum name, found {}", other.describe())))
            }
            None => Err(self.error("expected enum name, found end of input")),
        }
    }

    fn expect_colon(&mut self) -> Result<(), ContractError> {
        match self.next() {
            Some(Token::Colon) => Ok(()),
            Some(other) => Err(self.error(format!("expected `:`, found {}", other.describe()))),
            None => Err(self.error("expected `:`, found end of input")),
        }
    }

    /// Consume an opening brace, with an optional colon before it.
    fn open_message(&mut self) -> Result<(), ContractError> {
        if matches!(self.peek(), Some(Token::Colon)) {
            self.next();
        }
        match self.next() {
            Some(Token::LBrace) => Ok(()),
            Some(other) => Err(self.error(format!("expected `{{`, found {}", other.describe()))),
            None => Err(self.error("expected `{`, found end of input")),
        }
    }

    /// True when the current message body is finished; consumes the brace.
    fn close_message(&mut self) -> bool {
        if matches!(self.peek(), Some(Token::RBrace)) {
            self.next();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// Parse the text encoding into a contract.
pub fn parse(input: &str) -> Result<ModelContract, ContractError> {
    let tokens = tokenize(input)?;
    let mut p = Parser { tokens, pos: 0 };
    let mut contract = ModelContract::default();

    while !p.at_end() {
        let field = p.field_name()?;
        match field.as_str() {
            "model_name" => contract.model_name = p.string_value()?,
            "signatures" => {
                p.open_message()?;
                contract.signatures.push(parse_signature(&mut p)?);
            }
            other => return Err(p.error(format!("unknown field `{other}` in ModelContract"))),
        }
    }

    Ok(contract)
}

fn parse_signature(p: &mut Parser) -> Result<ModelSignature, ContractError> {
    let mut signature = ModelSignature::default();
    loop {
        if p.close_message() {
            return Ok(signature);
        }
        let field = p.field_name()?;
        match field.as_str() {
            "signature_name" => signature.signature_name = p.string_value()?,
            "inputs" => {
                p.open_message()?;
                signature.inputs.push(parse_field(p)?);
            }
            "outputs" => {
                p.open_message()?;
                signature.outputs.push(parse_field(p)?);
            }
            other => return Err(p.error(format!("unknown field `{other}` in ModelSignature"))),
        }
    }
}

fn parse_field(p: &mut Parser) -> Result<ModelField, ContractError> {
    let mut field = ModelField::default();
    loop {
        if p.close_message() {
            return Ok(field);
        }
        let name = p.field_name()?;
        match name.as_str() {
            "name" => field.name = p.string_value()?,
            "shape" => {
                p.open_message()?;
                field.shape = Some(parse_shape(p)?);
            }
            "dtype" => {
                let name = p.enum_value()?;
                let dtype = DataType::from_str_name(&name)
                    .ok_or_else(|| p.error(format!("unknown data type `{name}`")))?;
                field.dtype = dtype as i32;
            }
            other => return Err(p.error(format!("unknown field `{other}` in ModelField"))),
        }
    }
}

fn parse_shape(p: &mut Parser) -> Result<TensorShape, ContractError> {
    let mut shape = TensorShape::default();
    loop {
        if p.close_message() {
            return Ok(shape);
        }
        let name = p.field_name()?;
        match name.as_str() {
            "dims" => shape.dims.push(p.int_value()?),
            other => return Err(p.error(format!("unknown field `{other}` in TensorShape"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Render a contract in the text encoding.
pub fn render(contract: &ModelContract) -> String {
    let mut out = String::new();
    render_string(&mut out, 0, "model_name", &contract.model_name);
    for signature in &contract.signatures {
        push_indent(&mut out, 0);
        out.push_str("signatures {\n");
        render_string(&mut out, 1, "signature_name", &signature.signature_name);
        for input in &signature.inputs {
            render_field(&mut out, 1, "inputs", input);
        }
        for output in &signature.outputs {
            render_field(&mut out, 1, "outputs", output);
        }
        out.push_str("}\n");
    }
    out
}

fn render_field(out: &mut String, indent: usize, label: &str, field: &ModelField) {
    push_indent(out, indent);
    out.push_str(label);
    out.push_str(" {\n");
    render_string(out, indent + 1, "name", &field.name);
    if let Some(shape) = &field.shape {
        push_indent(out, indent + 1);
        out.push_str("shape {\n");
        for dim in &shape.dims {
            push_indent(out, indent + 2);
            out.push_str(&format!("dims: {dim}\n"));
        }
        push_indent(out, indent + 1);
        out.push_str("}\n");
    }
    push_indent(out, indent + 1);
    out.push_str(&format!("dtype: {}\n", field.data_type().as_str_name()));
    push_indent(out, indent);
    out.push_str("}\n");
}

fn render_string(out: &mut String, indent: usize, label: &str, value: &str) {
    push_indent(out, indent);
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t");
    out.push_str(&format!("{label}: \"{escaped}\"\n"));
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::tests::sample_contract;

    #[test]
    fn test_render_parse_roundtrip() {
        let contract = sample_contract();
        let text = render(&contract);
        let parsed = parse(&text).unwrap();
        assert_eq!(contract, parsed);
    }

    #[test]
    fn test_parse_with_comments_and_colon_before_brace() {
        let text = r#"
# iris classifier
model_name: "iris"
signatures: {
  signature_name: "predict"
  inputs: {
    name: "x"
    shape: { dims: -1 dims: 4 }
    dtype: FLOAT32
  }
}
"#;
        let contract = parse(text).unwrap();
        assert_eq!(contract.model_name, "iris");
        assert_eq!(contract.signatures.len(), 1);
        assert_eq!(contract.signatures[0].inputs[0].shape.as_ref().unwrap().dims, vec![-1, 4]);
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        let text = "model_name: \"m\"\nsignatures {\n  bogus: 1\n}\n";
        let err = parse(text).unwrap_err();
        match err {
            ContractError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("bogus"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_dtype() {
        let text = "signatures { inputs { name: \"x\" dtype: COMPLEX128 } }";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, ContractError::Parse { .. }));
    }

    #[test]
    fn test_parse_unterminated_string() {
        let err = parse("model_name: \"iris").unwrap_err();
        assert!(matches!(err, ContractError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_string_escapes_roundtrip() {
        let mut contract = sample_contract();
        contract.model_name = "weird \"name\"\twith\nbreaks\\".to_string();
        let parsed = parse(&render(&contract)).unwrap();
        assert_eq!(parsed.model_name, contract.model_name);
    }

    #[test]
    fn test_empty_input_is_default_contract() {
        let contract = parse("").unwrap();
        assert_eq!(contract, ModelContract::default());
    }
}
