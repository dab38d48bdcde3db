//! Interactive menu over a flashcard store.
//!
//! The console reads single-letter commands and forwards them to the store.
//! It is generic over its input and output so it can be driven from tests.

use std::io::{BufRead, Write};

use cardflash::{CardId, Error, FlashcardStore, Result};
use tracing::{debug, warn};

const RULE_WIDTH: usize = 30;

/// A menu command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create a card.
    New,
    /// Edit a card's question and answer.
    Edit,
    /// Delete a card.
    Delete,
    /// Review a random sequence of cards.
    Random,
    /// List every card.
    All,
    /// Leave the menu.
    Quit,
}

impl Command {
    /// Parse a menu line. Unknown input yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "N" | "n" => Some(Command::New),
            "E" | "e" => Some(Command::Edit),
            "D" | "d" => Some(Command::Delete),
            "R" | "r" => Some(Command::Random),
            "A" | "a" => Some(Command::All),
            "Q" | "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// The interactive menu loop.
pub struct Console<'a, R, W> {
    store: &'a FlashcardStore,
    input: R,
    output: W,
    review_size: usize,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    /// Create a console over `store` that draws `review_size` cards per review.
    pub fn new(store: &'a FlashcardStore, input: R, output: W, review_size: usize) -> Self {
        Self {
            store,
            input,
            output,
            review_size,
        }
    }

    /// Run until the user quits or input ends.
    ///
    /// Store failures inside a command are reported and the menu continues.
    /// Only failures to read or write the terminal end the loop.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "====== CARDSFLASH ======")?;
        self.menu()?;

        while let Some(line) = self.read_line()? {
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            debug!(?command, "Menu command");

            let outcome = match command {
                Command::New => self.new_card(),
                Command::Edit => self.edit_card(),
                Command::Delete => self.delete_card(),
                Command::Random => self.random_cards(),
                Command::All => self.all_cards(),
                Command::Quit => return Ok(()),
            };

            match outcome {
                Ok(()) => {}
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    warn!(?command, error = %e, "Command failed");
                    writeln!(self.output, "Error: {}", e)?;
                }
            }
            self.menu()?;
        }

        Ok(())
    }

    fn menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}\n", "_".repeat(RULE_WIDTH))?;
        writeln!(self.output, "(N)ew card")?;
        writeln!(self.output, "(E)dit card")?;
        writeln!(self.output, "(D)elete card")?;
        writeln!(self.output, "(R)andom cards")?;
        writeln!(self.output, "(A)ll cards")?;
        writeln!(self.output, "(Q)uit")?;
        write!(self.output, "\n>")?;
        self.output.flush()?;
        Ok(())
    }

    fn new_card(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- New Card ---")?;
        let Some((question, answer)) = self.prompt_card()? else {
            return Ok(());
        };
        let id = self.store.insert(&question, &answer)?;
        writeln!(self.output, "Successfully created card {}!", id)?;
        Ok(())
    }

    fn edit_card(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Edit Card ---")?;
        let Some(id) = self.prompt_id()? else {
            return Ok(());
        };

        match self.store.get(id)? {
            Some(card) => writeln!(self.output, "{}", card)?,
            None => {
                writeln!(self.output, "no flashcard found with ID {}", id)?;
                return Ok(());
            }
        }

        let Some((question, answer)) = self.prompt_card()? else {
            return Ok(());
        };
        if self.store.update(id, &question, &answer)? {
            writeln!(self.output, "Successfully updated card {}!", id)?;
        }
        Ok(())
    }

    fn delete_card(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Delete Card ---")?;
        let Some(id) = self.prompt_id()? else {
            return Ok(());
        };

        if self.store.delete(id)? {
            writeln!(self.output, "Successfully deleted card {}!", id)?;
        } else {
            writeln!(self.output, "No flashcard found with ID {}", id)?;
        }
        Ok(())
    }

    fn random_cards(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Random Cards ---")?;

        let cards = self.store.random(self.review_size)?;
        if cards.is_empty() {
            writeln!(self.output, "No cards available.")?;
            return Ok(());
        }

        writeln!(
            self.output,
            "\nPress Enter to see the answer, then Enter for the next card..."
        )?;

        let total = cards.len();
        for (i, card) in cards.iter().enumerate() {
            writeln!(self.output, "\n{}", "_".repeat(RULE_WIDTH))?;
            writeln!(self.output, "Card {}/{}", i + 1, total)?;
            write!(self.output, "Question: {}", card.question())?;
            self.output.flush()?;
            if self.read_line()?.is_none() {
                return Ok(());
            }

            writeln!(self.output, "Answer: {}", card.answer())?;

            if i + 1 < total {
                write!(self.output, "\nPress Enter")?;
                self.output.flush()?;
                if self.read_line()?.is_none() {
                    return Ok(());
                }
            }
        }

        writeln!(self.output, "\nSequence completed!")?;
        Ok(())
    }

    fn all_cards(&mut self) -> Result<()> {
        let lines = self.store.render_all()?;
        if lines.is_empty() {
            writeln!(self.output, "No cards available.")?;
        }
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    /// Ask for an id. A malformed id is reported and yields `None`.
    fn prompt_id(&mut self) -> Result<Option<CardId>> {
        write!(self.output, "ID\n>")?;
        self.output.flush()?;
        let Some(line) = self.read_line()? else {
            return Ok(None);
        };

        match line.parse::<CardId>() {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                Ok(None)
            }
        }
    }

    /// Ask for a question and an answer. `None` if input ended.
    fn prompt_card(&mut self) -> Result<Option<(String, String)>> {
        write!(self.output, "Question\n>")?;
        self.output.flush()?;
        let Some(question) = self.read_line()? else {
            return Ok(None);
        };

        write!(self.output, "\nAnswer\n>")?;
        self.output.flush()?;
        let Some(answer) = self.read_line()? else {
            return Ok(None);
        };

        Ok(Some((question, answer)))
    }

    /// One line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_session(store: &FlashcardStore, input: &str) -> String {
        let mut output = Vec::new();
        Console::new(store, Cursor::new(input.as_bytes()), &mut output, 10)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn id(raw: i64) -> CardId {
        CardId::new(raw).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("n"), Some(Command::New));
        assert_eq!(Command::parse("E"), Some(Command::Edit));
        assert_eq!(Command::parse(" d "), Some(Command::Delete));
        assert_eq!(Command::parse("r"), Some(Command::Random));
        assert_eq!(Command::parse("A"), Some(Command::All));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("x"), None);
        assert_eq!(Command::parse("new"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_new_card() {
        let store = FlashcardStore::in_memory().unwrap();
        let out = run_session(&store, "n\nCapital of France?\nParis\nq\n");

        assert!(out.contains("Successfully created card 1!"));
        let card = store.get(id(1)).unwrap().unwrap();
        assert_eq!(card.question(), "Capital of France?");
        assert_eq!(card.answer(), "Paris");
    }

    #[test]
    fn test_new_card_empty_answer_is_reported() {
        let store = FlashcardStore::in_memory().unwrap();
        let out = run_session(&store, "n\nQuestion\n\nq\n");

        assert!(out.contains("Error: validation error: answer must not be empty"));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_edit_card() {
        let store = FlashcardStore::in_memory().unwrap();
        store.insert("Capital of France?", "Paris").unwrap();

        let out = run_session(&store, "e\n1\nCapitale de la France?\nParis\nq\n");

        assert!(out.contains("1 | Capital of France? -> Paris | "));
        assert!(out.contains("Successfully updated card 1!"));
        let card = store.get(id(1)).unwrap().unwrap();
        assert_eq!(card.question(), "Capitale de la France?");
        assert!(card.was_updated());
    }

    #[test]
    fn test_edit_missing_card_skips_prompts() {
        let store = FlashcardStore::in_memory().unwrap();
        // The "a" after the id must be read as a menu command, not a question.
        let out = run_session(&store, "e\n5\na\nq\n");

        assert!(out.contains("no flashcard found with ID 5"));
        assert!(!out.contains("Question\n>"));
        assert!(out.contains("No cards available."));
    }

    #[test]
    fn test_invalid_id_is_reported() {
        let store = FlashcardStore::in_memory().unwrap();
        store.insert("Q", "A").unwrap();
        let out = run_session(&store, "d\nabc\nd\n-1\nq\n");

        assert!(out.contains("Error: validation error: 'abc' is not a valid card id"));
        assert!(out.contains("card id must be a positive integer"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_card() {
        let store = FlashcardStore::in_memory().unwrap();
        store.insert("Q1", "A1").unwrap();
        store.insert("Q2", "A2").unwrap();

        let out = run_session(&store, "d\n2\nd\n2\nq\n");

        assert!(out.contains("Successfully deleted card 2!"));
        assert!(out.contains("No flashcard found with ID 2"));
        assert_eq!(store.all_ids().unwrap(), vec![id(1)]);
    }

    #[test]
    fn test_all_cards() {
        let store = FlashcardStore::in_memory().unwrap();
        store.insert("Q1", "A1").unwrap();
        store.insert("Q2", "A2").unwrap();

        let out = run_session(&store, "a\nq\n");
        let first = out.find("1 | Q1 -> A1 | ").unwrap();
        let second = out.find("2 | Q2 -> A2 | ").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_random_review() {
        let store = FlashcardStore::in_memory().unwrap();
        store.insert("Q1", "A1").unwrap();
        store.insert("Q2", "A2").unwrap();

        // r, then Enter (answer), Enter (next), Enter (answer), then quit.
        let out = run_session(&store, "r\n\n\n\nq\n");

        assert!(out.contains("Card 1/2"));
        assert!(out.contains("Card 2/2"));
        assert!(out.contains("Answer: A1"));
        assert!(out.contains("Answer: A2"));
        assert!(out.contains("Sequence completed!"));
    }

    #[test]
    fn test_random_review_respects_size() {
        let store = FlashcardStore::in_memory().unwrap();
        for i in 0..5 {
            store.insert(&format!("Q{}", i), "A").unwrap();
        }

        let mut output = Vec::new();
        Console::new(&store, Cursor::new("r\n\n\n\nq\n".as_bytes()), &mut output, 2)
            .run()
            .unwrap();
        let out = String::from_utf8(output).unwrap();

        assert!(out.contains("Card 2/2"));
        assert!(!out.contains("Card 3/"));
    }

    #[test]
    fn test_random_on_empty_store() {
        let store = FlashcardStore::in_memory().unwrap();
        let out = run_session(&store, "r\nq\n");
        assert!(out.contains("No cards available."));
        assert!(!out.contains("Sequence completed!"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let store = FlashcardStore::in_memory().unwrap();
        let out = run_session(&store, "x\nn\nhalf a card");
        assert!(out.starts_with("====== CARDSFLASH ======"));
        assert_eq!(store.count().unwrap(), 0);
    }
}
