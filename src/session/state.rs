use std::fmt;

use strum::EnumIter;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::EnumIs)]
pub enum SessionState {
    #[default]
    Idle,
    CreateWallet,
    AccessWallet,
    ListWallets,
    Terminated,
}

/// The numbered main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum MenuChoice {
    CreateWallet,
    AccessWallet,
    ListWallets,
    Exit,
}

impl MenuChoice {
    pub fn number(self) -> u8 {
        match self {
            Self::CreateWallet => 1,
            Self::AccessWallet => 2,
            Self::ListWallets => 3,
            Self::Exit => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CreateWallet => "Create new encrypted wallet",
            Self::AccessWallet => "Access existing wallet",
            Self::ListWallets => "List saved wallets",
            Self::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::iter().find(|choice| choice.number().to_string() == input)
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

/// Something that moves the session along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A line typed at the main menu.
    MenuInput(String),

    /// Input ended at the main menu.
    EndOfInput,

    /// The running operation returned, successfully or not.
    OperationFinished,
}

impl SessionState {
    /// The state after `event`. Anything unexpected leaves the state as is.
    pub fn next(self, event: &SessionEvent) -> Self {
        match (self, event) {
            (Self::Idle, SessionEvent::MenuInput(line)) => match MenuChoice::parse(line) {
                Some(MenuChoice::CreateWallet) => Self::CreateWallet,
                Some(MenuChoice::AccessWallet) => Self::AccessWallet,
                Some(MenuChoice::ListWallets) => Self::ListWallets,
                Some(MenuChoice::Exit) => Self::Terminated,
                None => Self::Idle,
            },
            (Self::Idle, SessionEvent::EndOfInput) => Self::Terminated,
            (
                Self::CreateWallet | Self::AccessWallet | Self::ListWallets,
                SessionEvent::OperationFinished,
            ) => Self::Idle,
            (state, _) => state,
        }
    }
}
