//! One client conversation, from greeting to goodbye.
//!
//! A session reads a single input line, validates and tokenizes it, ranks
//! every token against the dictionary in parallel and then walks the tokens
//! in order. Tokens found verbatim in the dictionary pass through; for every
//! other token the client is shown the ranked candidates and asked whether
//! to add the token, keep the best suggestion, or quit. A completed session
//! ends with an `INPUT`/`OUTPUT` summary; a rejected or aborted one does not.
//!
//! The session owns its reader and writer. Nothing it sends ever goes to a
//! stream other than its own.

use std::io::{self, BufRead, Read, Write};
use std::sync::PoisonError;

use log::{debug, info, warn};

use crate::config::Limits;
use crate::dictionary::SharedDictionary;
use crate::error::{SessionError, ValidationError};
use crate::matcher::{Candidates, match_tokens};

pub const GREETING: &str = "Hello, this is Text Analysis Server!";
pub const INPUT_PROMPT: &str = "Please enter your input string:";
pub const ADD_PROMPT: &str = "Do you want to add this word to dictionary or exit? (y/N/q): ";
pub const WORD_ADDED: &str = "Word added to dictionary.";
pub const WORD_NOT_ADDED: &str = "Word not added to dictionary.";
pub const CLOSED_BY_USER: &str = "Connection closed by user.";
pub const GOODBYE: &str = "Thanks for using Text Analysis Server! Goodbye!";

/// Extra bytes read past the input limit so an overlong line is seen as such.
const READ_SLACK: usize = 10;

/// Checks a client line with its terminator already stripped.
///
/// Accepted input is at most `max_len` characters of ASCII letters separated
/// by single spaces. An empty line is valid and holds no tokens.
pub fn validate(input: &str, max_len: usize) -> Result<(), ValidationError> {
    if input.chars().count() > max_len {
        return Err(ValidationError::TooLong { max: max_len });
    }
    let letters_only = input.chars().all(|c| c.is_ascii_alphabetic() || c == ' ');
    let single_spaced =
        !input.starts_with(' ') && !input.ends_with(' ') && !input.contains("  ");
    if !(letters_only && single_spaced) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(())
}

/// Lowercases validated input and splits it on single spaces.
pub fn tokenize(input: &str, max_tokens: usize) -> Result<Vec<String>, ValidationError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let count = input.split(' ').count();
    if count > max_tokens {
        return Err(ValidationError::TooManyTokens {
            count,
            max: max_tokens,
        });
    }
    Ok(input.to_lowercase().split(' ').map(String::from).collect())
}

/// The client's answer to the add prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Add,
    Quit,
    Decline,
}

impl Reply {
    /// Anything other than a leading `y` or `q` declines.
    pub fn parse(line: &str) -> Self {
        match line.chars().next() {
            Some('y' | 'Y') => Reply::Add,
            Some('q' | 'Q') => Reply::Quit,
            _ => Reply::Decline,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every token was resolved and the summary was sent.
    Completed { input: String, output: String },
    /// The client quit at a prompt.
    Aborted,
    /// The input line was refused.
    Rejected(ValidationError),
}

pub struct Session<R, W> {
    reader: R,
    writer: W,
    dictionary: SharedDictionary,
    limits: Limits,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(reader: R, writer: W, dictionary: SharedDictionary, limits: Limits) -> Self {
        Session {
            reader,
            writer,
            dictionary,
            limits,
        }
    }

    /// Drives the whole protocol. Errors mean the transport or the word store
    /// failed; the client has been told nothing further in that case.
    pub fn run(mut self) -> Result<Outcome, SessionError> {
        self.send(GREETING)?;
        self.send(INPUT_PROMPT)?;
        self.writer.flush()?;

        let input = match self.read_line(false)? {
            Some(Ok(line)) => line,
            Some(Err(_)) => return self.reject(ValidationError::InvalidCharacters),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "client closed before sending input",
                )
                .into());
            }
        };

        let tokens = match validate(&input, self.limits.max_input_length)
            .and_then(|()| tokenize(&input, self.limits.max_tokens))
        {
            Ok(tokens) => tokens,
            Err(err) => return self.reject(err),
        };

        let matches = {
            let dictionary = self.dictionary.read().unwrap_or_else(PoisonError::into_inner);
            match_tokens(&tokens, dictionary.words(), self.limits.suggestions)
        };

        let mut output = Vec::with_capacity(matches.len());
        for (idx, candidates) in matches.iter().enumerate() {
            match self.resolve(idx + 1, candidates)? {
                Some(word) => output.push(word),
                None => {
                    info!("session aborted by client at word {}", idx + 1);
                    return Ok(Outcome::Aborted);
                }
            }
        }
        let output = output.join(" ");

        self.send("")?;
        self.send(&format!("INPUT : {input}"))?;
        self.send(&format!("OUTPUT: {output}"))?;
        self.send(GOODBYE)?;
        self.writer.flush()?;

        info!("session completed: {input:?} -> {output:?}");
        Ok(Outcome::Completed { input, output })
    }

    /// Shows one token's matches and decides which word it becomes.
    /// `None` means the client quit.
    fn resolve(
        &mut self,
        number: usize,
        candidates: &Candidates,
    ) -> Result<Option<String>, SessionError> {
        let token = candidates.token();
        self.send(&format!("WORD {number:02}: {token}"))?;
        self.send(&format!("MATCHES: {candidates}"))?;

        if candidates.is_exact_match() {
            debug!("'{token}' found in dictionary");
            return Ok(Some(token.to_string()));
        }

        self.send(&format!("WORD '{token}' is not present in dictionary."))?;
        write!(self.writer, "{ADD_PROMPT}")?;
        self.writer.flush()?;

        let reply = match self.read_line(true) {
            Ok(Some(Ok(line))) => Reply::parse(&line),
            Ok(Some(Err(_)) | None) => Reply::Decline,
            Err(err) => {
                debug!("reading reply for '{token}' failed: {err}");
                Reply::Decline
            }
        };
        debug!("reply for '{token}': {reply:?}");

        match reply {
            Reply::Add => {
                self.dictionary
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .append(token)?;
                info!("added '{token}' to dictionary");
                self.send(WORD_ADDED)?;
                Ok(Some(token.to_string()))
            }
            Reply::Quit => {
                self.send(CLOSED_BY_USER)?;
                self.writer.flush()?;
                Ok(None)
            }
            Reply::Decline => {
                self.send(WORD_NOT_ADDED)?;
                let word = candidates
                    .best()
                    .map_or_else(|| token.to_string(), |best| best.word.clone());
                Ok(Some(word))
            }
        }
    }

    fn reject(&mut self, err: ValidationError) -> Result<Outcome, SessionError> {
        warn!("rejected input: {err}");
        self.send(&err.to_string())?;
        self.writer.flush()?;
        Ok(Outcome::Rejected(err))
    }

    /// Reads one line of at most the input limit plus slack, without its
    /// terminator. `None` on end of stream, `Some(Err(_))` when the bytes are
    /// not UTF-8. With `drain`, whatever a truncated line had left up to its
    /// newline is discarded so it cannot answer a later prompt.
    fn read_line(
        &mut self,
        drain: bool,
    ) -> io::Result<Option<Result<String, std::string::FromUtf8Error>>> {
        let limit = (self.limits.max_input_length + READ_SLACK) as u64;
        let mut buf = Vec::new();
        let read = self.reader.by_ref().take(limit).read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        if drain && read as u64 == limit && buf.last() != Some(&b'\n') {
            self.reader.skip_until(b'\n')?;
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        Ok(Some(String::from_utf8(buf)))
    }

    fn send(&mut self, line: &str) -> io::Result<()> {
        write!(self.writer, "{line}\r\n")
    }
}
