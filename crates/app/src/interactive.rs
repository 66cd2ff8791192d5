//! Line-based quiz runner over any reader/writer pair.

use std::io::{self, BufRead, Write};

use quiz_core::session::option_label;
use quiz_core::{AnswerFeedback, QuizSession};
use services::{Advance, CompletedQuiz, QuizService, QuizServiceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TakeError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Service(#[from] QuizServiceError),
    /// Input ended before the quiz was finished.
    #[error("quiz aborted before completion")]
    Aborted,
}

/// Accept `B`, `b` or `2` for the second of `len` options.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let input = input.trim();
    if let Ok(number) = input.parse::<usize>() {
        return number.checked_sub(1).filter(|i| *i < len);
    }
    let mut chars = input.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let c = c.to_ascii_uppercase();
    if !c.is_ascii_uppercase() {
        return None;
    }
    let index = usize::from(u8::try_from(c).ok()? - b'A');
    (index < len).then_some(index)
}

fn read_line(input: &mut impl BufRead) -> Result<String, TakeError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(TakeError::Aborted);
    }
    Ok(line.trim().to_owned())
}

fn write_question(out: &mut impl Write, session: &QuizSession) -> io::Result<()> {
    let Some(question) = session.current_question() else {
        return Ok(());
    };
    let progress = session.progress();
    writeln!(out)?;
    writeln!(
        out,
        "[{}/{}] {}",
        progress.current_index + 1,
        progress.total,
        question.text()
    )?;
    for (i, option) in question.options().iter().enumerate() {
        writeln!(out, "  {}. {option}", option_label(i))?;
    }
    Ok(())
}

fn write_feedback(
    out: &mut impl Write,
    session: &QuizSession,
    feedback: &AnswerFeedback,
) -> io::Result<()> {
    if feedback.is_correct {
        writeln!(out, "Correct!")?;
    } else {
        let answer = session
            .current_question()
            .and_then(|q| q.options().get(feedback.correct_index))
            .map_or("", String::as_str);
        writeln!(
            out,
            "Incorrect. The answer is {}. {answer}",
            option_label(feedback.correct_index)
        )?;
    }
    if !feedback.explanation.is_empty() {
        writeln!(out, "{}", feedback.explanation)?;
    }
    Ok(())
}

/// Select, confirm, read feedback, move on; until the quiz completes.
///
/// A selection can be changed any number of times before it is confirmed with
/// an empty line.
///
/// # Errors
///
/// Returns `TakeError::Aborted` if input runs out mid-quiz.
pub fn take_quiz(
    service: &QuizService,
    session: &mut QuizSession,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<CompletedQuiz, TakeError> {
    writeln!(
        out,
        "{} ({} questions) for {}",
        session.quiz_title(),
        session.total_questions(),
        session.taker_name()
    )?;

    loop {
        write_question(out, session)?;
        let len = session
            .current_question()
            .map_or(0, |q| q.options().len());

        loop {
            match session.selected() {
                Some(selected) => write!(
                    out,
                    "Selected {}. Enter to confirm, or pick another: ",
                    option_label(selected)
                )?,
                None => write!(out, "Your answer: ")?,
            }
            out.flush()?;

            let line = read_line(input)?;
            if line.is_empty() && session.selected().is_some() {
                break;
            }
            match parse_choice(&line, len) {
                Some(index) => session
                    .select_option(index)
                    .map_err(QuizServiceError::from)?,
                None => writeln!(out, "Pick one of the listed options.")?,
            }
        }

        let feedback = session
            .confirm_answer()
            .map_err(QuizServiceError::from)?;
        write_feedback(out, session, &feedback)?;

        let last = session.current_index() + 1 == session.total_questions();
        let prompt = if last {
            "Enter to see your result "
        } else {
            "Enter for the next question "
        };
        write!(out, "{prompt}")?;
        out.flush()?;
        read_line(input)?;

        if let Advance::Completed(done) = service.advance(session)? {
            return Ok(done);
        }
    }
}

pub fn write_result(out: &mut impl Write, done: &CompletedQuiz) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}: {}/{} correct ({}%)",
        done.record.quiz_title,
        done.record.score,
        done.record.total_questions,
        done.record.percentage
    )?;
    writeln!(out, "{}", done.feedback.message())
}
