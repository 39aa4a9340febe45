use paperdeck_core::DateRange;

/// A user intent, decoupled from the key or mouse event that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    GoTop,
    GoBottom,
    /// Enter in normal mode: search for the chosen author, if any.
    DrillIn,
    NavigateBack,
    /// Focus the search box.
    StartSearch,
    /// A character typed into the search box (`'\x08'` is backspace).
    SearchInput(char),
    SearchConfirm,
    SearchCancel,
    SelectDateRange(DateRange),
    NextDateRange,
    PrevDateRange,
    Reset,
    NextAuthor,
    PrevAuthor,
    ShowAllAuthors,
    CopyLink,
    SaveConfig,
    ToggleHelp,
    ClickAt(u16, u16),
    Resize(u16, u16),
    Tick,
    None,
}
