//! Status display trait for abstraction and testability
//!
//! The tracker pushes human-readable status tuples (a title plus detail
//! lines) to whatever screen the hardware offers. Purely presentational, not
//! part of the wire protocol.

/// Abstract status screen interface
pub trait StatusScreen {
    /// Replace the screen contents with a title and up to a few detail lines.
    fn show(&mut self, title: &str, lines: &[&str]);
}

#[cfg(test)]
pub mod mock {
    //! Mock status screen for testing

    use super::*;
    use core::cell::RefCell;
    use heapless::{String, Vec};

    /// One recorded screen update
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ScreenPage {
        pub title: String<32>,
        pub lines: Vec<String<64>, 6>,
    }

    /// Mock screen recording every update for inspection
    pub struct MockScreen {
        pages: RefCell<Vec<ScreenPage, 16>>,
    }

    impl MockScreen {
        pub fn new() -> Self {
            Self {
                pages: RefCell::new(Vec::new()),
            }
        }

        /// All pages shown so far, oldest first
        pub fn pages(&self) -> Vec<ScreenPage, 16> {
            self.pages.borrow().clone()
        }

        /// Title of the most recent page, if any
        pub fn last_title(&self) -> Option<String<32>> {
            self.pages.borrow().last().map(|page| page.title.clone())
        }
    }

    impl Default for MockScreen {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StatusScreen for MockScreen {
        fn show(&mut self, title: &str, lines: &[&str]) {
            let mut page = ScreenPage {
                title: String::new(),
                lines: Vec::new(),
            };
            let _ = page.title.push_str(title);
            for line in lines {
                let mut stored = String::new();
                let _ = stored.push_str(line);
                let _ = page.lines.push(stored);
            }
            let _ = self.pages.borrow_mut().push(page);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_records_pages_in_order() {
            let mut screen = MockScreen::new();

            screen.show("INFO", &["booting"]);
            screen.show("<< TX >>", &["message text"]);

            let pages = screen.pages();
            assert_eq!(pages.len(), 2);
            assert_eq!(pages[0].title.as_str(), "INFO");
            assert_eq!(pages[1].lines[0].as_str(), "message text");
            assert_eq!(screen.last_title().unwrap().as_str(), "<< TX >>");
        }
    }
}
