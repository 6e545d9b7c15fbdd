use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "lysta", about = concat!("lysta v", env!("CARGO_PKG_VERSION"), " - checklists in plain text"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a lysta/ directory here
    Init(InitArgs),
    /// Show all lists in order
    Lists,
    /// Create a new list
    New(NewArgs),
    /// Rename a list
    Rename(RenameArgs),
    /// Delete a list
    Rm(ListArg),
    /// Move a list to another position
    Mv(MvArgs),
    /// Show the items of a list
    Show(ListArg),
    /// Add an item to a list
    Add(AddArgs),
    /// Check an item
    Check(ItemArg),
    /// Uncheck an item
    Uncheck(ItemArg),
    /// Change an item's description
    Edit(EditArgs),
    /// Delete an item
    Del(ItemArg),
    /// Move an item to another position
    MvItem(MvItemArgs),
    /// Turn alphabetical sorting on or off
    Sort(ToggleArgs),
    /// Show or hide checked items
    ShowChecked(ToggleArgs),
    /// Suggest existing items matching a prefix
    Suggest(SuggestArgs),
    /// Uncheck every item with exactly this description
    Pick(PickArgs),
    /// View the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// List commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Seed the Groceries and Backpacking example lists
    #[arg(long)]
    pub examples: bool,
    /// Reinitialize even if lysta/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct NewArgs {
    /// List name (default from [defaults] in lysta.toml)
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ListArg {
    /// List id, name (case-insensitive) or 1-based position
    pub list: String,
}

#[derive(Args)]
pub struct RenameArgs {
    pub list: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Current 1-based position
    pub from: usize,
    /// New 1-based position
    pub to: usize,
}

// ---------------------------------------------------------------------------
// Item commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    pub list: String,
    /// Item description
    pub description: String,
    /// Add the item already checked
    #[arg(long)]
    pub checked: bool,
}

#[derive(Args)]
pub struct ItemArg {
    pub list: String,
    /// 1-based position as shown by `lysta show`
    pub position: usize,
}

#[derive(Args)]
pub struct EditArgs {
    pub list: String,
    pub position: usize,
    /// New description
    pub description: String,
}

#[derive(Args)]
pub struct MvItemArgs {
    pub list: String,
    /// Current 1-based position as shown
    pub from: usize,
    /// New 1-based position as shown
    pub to: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Args)]
pub struct ToggleArgs {
    pub list: String,
    #[arg(value_enum)]
    pub state: Toggle,
}

#[derive(Args)]
pub struct SuggestArgs {
    pub list: String,
    /// Prefix to match, ignoring case
    pub query: String,
}

#[derive(Args)]
pub struct PickArgs {
    pub list: String,
    /// Exact description of the item(s) to bring back
    pub text: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print the absolute path to the recovery log
    #[arg(long)]
    pub path: bool,
}
