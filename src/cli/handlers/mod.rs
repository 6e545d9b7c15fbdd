mod init;
pub use init::cmd_init;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::data_dir::discover_data_dir;
use crate::io::recovery::{read_recovery_entries, recovery_log_path};
use crate::model::{Item, ListSummary};
use crate::repo::FileRepository;
use crate::store::{EventChannel, EventReceiver, Inserted, ItemStore, ListStore};

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let start = start_dir(cli.dir.as_deref())?;

    match cli.command {
        // No data directory needed yet
        Commands::Init(args) => cmd_init(args, &start, json),
        Commands::Recovery(args) => cmd_recovery(args, &start, json),

        command => {
            let mut session = Session::open(&start)?;
            match command {
                Commands::Init(_) | Commands::Recovery(_) => Ok(()),

                // List commands
                Commands::Lists => cmd_lists(&session, json),
                Commands::New(args) => cmd_new(&mut session, args, json),
                Commands::Rename(args) => cmd_rename(&mut session, args),
                Commands::Rm(args) => cmd_rm(&mut session, args),
                Commands::Mv(args) => cmd_mv(&mut session, args),

                // Item commands
                Commands::Show(args) => cmd_show(&session, args, json),
                Commands::Add(args) => cmd_add(&session, args, json),
                Commands::Check(args) => cmd_set_checked(&session, args, true, json),
                Commands::Uncheck(args) => cmd_set_checked(&session, args, false, json),
                Commands::Edit(args) => cmd_edit(&session, args),
                Commands::Del(args) => cmd_del(&session, args),
                Commands::MvItem(args) => cmd_mv_item(&session, args),
                Commands::Sort(args) => cmd_sort(&session, args),
                Commands::ShowChecked(args) => cmd_show_checked(&session, args),
                Commands::Suggest(args) => cmd_suggest(&session, args, json),
                Commands::Pick(args) => cmd_pick(&session, args, json),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory to start from: `-C <dir>` if given, else the working directory
fn start_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn Error>> {
    match dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

/// Stores wired to the discovered data directory for one command
struct Session {
    repo: Rc<FileRepository>,
    events: EventChannel,
    receiver: EventReceiver,
    lists: ListStore,
}

impl Session {
    fn open(start: &Path) -> Result<Self, Box<dyn Error>> {
        let data_dir = discover_data_dir(start)?;
        let repo = Rc::new(FileRepository::open(&data_dir)?);
        let defaults = repo.defaults()?;
        let events = EventChannel::new();
        let receiver = events.subscribe();
        let lists = ListStore::new(repo.clone(), events.clone()).with_defaults(defaults);
        Ok(Session {
            repo,
            events,
            receiver,
            lists,
        })
    }

    fn list(&self, key: &str) -> Result<ListSummary, Box<dyn Error>> {
        let lists = self.lists.lists();
        let index = resolve_list(&lists, key).ok_or_else(|| format!("list not found: {}", key))?;
        Ok(lists[index].clone())
    }

    fn items(&self, key: &str) -> Result<ItemStore, Box<dyn Error>> {
        let list = self.list(key)?;
        Ok(ItemStore::open(
            self.repo.clone(),
            self.events.clone(),
            &list.id,
        )?)
    }
}

/// Find a list by exact id, then case-insensitive name, then 1-based position.
fn resolve_list(lists: &[ListSummary], key: &str) -> Option<usize> {
    if let Some(i) = lists.iter().position(|l| l.id == key) {
        return Some(i);
    }
    let lower = key.to_lowercase();
    if let Some(i) = lists.iter().position(|l| l.name.to_lowercase() == lower) {
        return Some(i);
    }
    match key.parse::<usize>() {
        Ok(n) if n >= 1 && n <= lists.len() => Some(n - 1),
        _ => None,
    }
}

/// Convert a 1-based position to an index into a collection of `len`
fn to_index(position: usize, len: usize, what: &str) -> Result<usize, Box<dyn Error>> {
    if position == 0 || position > len {
        return Err(format!("no {} at position {} (have {})", what, position, len).into());
    }
    Ok(position - 1)
}

fn item_at(store: &ItemStore, position: usize) -> Result<Item, Box<dyn Error>> {
    let items = store.projected_items();
    let index = to_index(position, items.len(), "item")?;
    Ok(items[index].clone())
}

// ---------------------------------------------------------------------------
// List commands
// ---------------------------------------------------------------------------

fn cmd_lists(session: &Session, json: bool) -> CmdResult {
    let lists = session.lists.lists();
    if json {
        println!("{}", serde_json::to_string_pretty(&lists_to_json(&lists))?);
    } else if lists.is_empty() {
        println!("No lists yet (create one with `lysta new <name>`)");
    } else {
        for row in format_list_rows(&lists) {
            println!("{}", row);
        }
    }
    Ok(())
}

fn cmd_new(session: &mut Session, args: NewArgs, json: bool) -> CmdResult {
    let id = session.lists.create(args.name.as_deref());
    let position = match session.receiver.next_inserted() {
        Some(Inserted::List { index }) => index + 1,
        _ => session.lists.lists().len(),
    };
    if json {
        let out = CreatedJson { id, position };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_rename(session: &mut Session, args: RenameArgs) -> CmdResult {
    let list = session.list(&args.list)?;
    session.lists.rename(&list.id, &args.name);
    Ok(())
}

fn cmd_rm(session: &mut Session, args: ListArg) -> CmdResult {
    let list = session.list(&args.list)?;
    session.lists.delete(&list.id);
    if let Some(notice) = session.receiver.take_notice() {
        println!("{}", notice.message);
    }
    Ok(())
}

fn cmd_mv(session: &mut Session, args: MvArgs) -> CmdResult {
    let len = session.lists.lists().len();
    let from = to_index(args.from, len, "list")?;
    let to = to_index(args.to, len, "list")?;
    session.lists.move_list(from, to);
    Ok(())
}

// ---------------------------------------------------------------------------
// Item commands
// ---------------------------------------------------------------------------

fn cmd_show(session: &Session, args: ListArg, json: bool) -> CmdResult {
    let store = session.items(&args.list)?;
    let items = store.projected_items();
    if json {
        let out = ListDetailJson {
            id: store.list_id().to_string(),
            name: store.name().to_string(),
            sorted: store.sorted(),
            show_checked: store.show_checked(),
            all_checked: store.all_checked(),
            items: items_to_json(&items),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{}",
        format_list_header(store.name(), store.sorted(), store.show_checked())
    );
    if items.is_empty() {
        let hidden = store.items().len();
        if hidden > 0 {
            println!("  ({} checked items hidden)", hidden);
        } else {
            println!("  (empty)");
        }
    }
    for row in format_item_rows(&items) {
        println!("{}", row);
    }
    Ok(())
}

fn cmd_add(session: &Session, args: AddArgs, json: bool) -> CmdResult {
    let mut store = session.items(&args.list)?;
    let item = store.add_item(&args.description, args.checked);
    let position = match session.receiver.next_inserted() {
        Some(Inserted::Item { index, .. }) => Some(index + 1),
        _ => None,
    };
    if json {
        let out = serde_json::json!({
            "id": item.id,
            "position": position,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if position.is_none() {
        println!("Added (hidden: checked items are not shown)");
    }
    Ok(())
}

fn cmd_set_checked(session: &Session, args: ItemArg, checked: bool, json: bool) -> CmdResult {
    let mut store = session.items(&args.list)?;
    let item = item_at(&store, args.position)?;
    let all_checked = store.update_checked(&item.id, checked);
    if json {
        let out = CheckedJson {
            id: item.id,
            checked,
            all_checked,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if all_checked {
        println!("All items in {} are checked", store.name());
    }
    Ok(())
}

fn cmd_edit(session: &Session, args: EditArgs) -> CmdResult {
    let mut store = session.items(&args.list)?;
    let item = item_at(&store, args.position)?;
    store.update_description(&item.id, &args.description);
    Ok(())
}

fn cmd_del(session: &Session, args: ItemArg) -> CmdResult {
    let mut store = session.items(&args.list)?;
    let item = item_at(&store, args.position)?;
    store.delete_item(&item.id);
    if let Some(notice) = session.receiver.take_notice() {
        println!("{}", notice.message);
    }
    Ok(())
}

fn cmd_mv_item(session: &Session, args: MvItemArgs) -> CmdResult {
    let mut store = session.items(&args.list)?;
    let len = store.projected_items().len();
    let from = to_index(args.from, len, "item")?;
    let to = to_index(args.to, len, "item")?;
    store.move_item(from, to);
    Ok(())
}

fn cmd_sort(session: &Session, args: ToggleArgs) -> CmdResult {
    let mut store = session.items(&args.list)?;
    store.set_sorted(args.state.enabled());
    Ok(())
}

fn cmd_show_checked(session: &Session, args: ToggleArgs) -> CmdResult {
    let mut store = session.items(&args.list)?;
    store.set_show_checked(args.state.enabled());
    Ok(())
}

fn cmd_suggest(session: &Session, args: SuggestArgs, json: bool) -> CmdResult {
    let store = session.items(&args.list)?;
    let suggestions = store.autocomplete_suggestions(&args.query);
    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else {
        for s in &suggestions {
            println!("{} {}", if s.checked { "[x]" } else { "[ ]" }, s.text);
        }
    }
    Ok(())
}

fn cmd_pick(session: &Session, args: PickArgs, json: bool) -> CmdResult {
    let mut store = session.items(&args.list)?;
    if !store.items().iter().any(|i| i.description == args.text) {
        return Err(format!("no item named '{}' in {}", args.text, store.name()).into());
    }
    store.select_suggestion(&args.text);
    let position = match session.receiver.next_inserted() {
        Some(Inserted::Item { index, .. }) => Some(index + 1),
        _ => None,
    };
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "position": position }))?
        );
    } else if let Some(position) = position {
        println!("{}", position);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(args: RecoveryArgs, start: &Path, json: bool) -> CmdResult {
    let data_dir = discover_data_dir(start)?;
    if args.path {
        println!("{}", recovery_log_path(&data_dir).display());
        return Ok(());
    }

    let entries = read_recovery_entries(&data_dir, Some(args.limit.unwrap_or(10)));
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("Recovery log is empty");
    } else {
        for entry in &entries {
            for line in format_recovery_entry(entry) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
