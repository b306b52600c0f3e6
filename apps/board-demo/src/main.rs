use std::error::Error;

use patchwork_app_shell::AppShell;
use patchwork_core::{h, on, props, Event, Host, MemoryHost, NodeId, Store, VNode};

#[derive(Clone, Debug)]
struct Post {
    id: u32,
    title: String,
    author: String,
    likes: u32,
    liked: bool,
    comments: Vec<String>,
}

#[derive(Clone, Debug, Default)]
struct Board {
    posts: Vec<Post>,
    draft: String,
}

impl Board {
    fn seeded() -> Self {
        let post = |id: u32, title: &str, author: &str, likes: u32| Post {
            id,
            title: title.to_owned(),
            author: author.to_owned(),
            likes,
            liked: false,
            comments: Vec::new(),
        };
        Self {
            posts: vec![
                post(1, "Shipping the positional reconciler", "ada", 12),
                post(2, "Why our list diff has no keys", "linus", 4),
                post(3, "Notes from the store refactor", "grace", 7),
            ],
            draft: String::new(),
        }
    }

    fn post_mut(&mut self, id: u32) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.id == id)
    }
}

fn post_card(store: &Store<Board>, post: &Post, draft: &str) -> VNode {
    let id = post.id;
    let like = {
        let store = store.clone();
        on(move |_: &Event| {
            store.set(|board| {
                if let Some(post) = board.post_mut(id) {
                    post.liked = !post.liked;
                    if post.liked {
                        post.likes += 1;
                    } else {
                        post.likes -= 1;
                    }
                }
            });
        })
    };
    let remove = {
        let store = store.clone();
        on(move |_: &Event| store.set(|board| board.posts.retain(|post| post.id != id)))
    };
    let comment = {
        let store = store.clone();
        on(move |_: &Event| {
            store.set(|board| {
                let text = std::mem::take(&mut board.draft);
                if let Some(post) = board.post_mut(id) {
                    if !text.trim().is_empty() {
                        post.comments.push(text);
                    }
                }
            });
        })
    };

    let comments: Vec<VNode> = post
        .comments
        .iter()
        .map(|comment| h!("li", props! { "className" => "comment" }, comment))
        .collect();

    h!(
        "article",
        props! { "className" => "post-card", "data-post" => id },
        h!("h2", None, post.title.as_str()),
        h!("p", props! { "className" => "byline" }, "by ", post.author.as_str()),
        h!(
            "button",
            props! {
                "className" => if post.liked { "like liked" } else { "like" },
                "aria-pressed" => post.liked,
                "data-action" => format!("like-{id}"),
                "onClick" => like,
            },
            "♥ ",
            post.likes
        ),
        h!("ul", props! { "className" => "comments" }, comments),
        h!(
            "button",
            props! {
                "data-action" => format!("comment-{id}"),
                "disabled" => draft.trim().is_empty(),
                "onClick" => comment,
            },
            "Comment"
        ),
        h!(
            "button",
            props! { "data-action" => format!("delete-{id}"), "onClick" => remove },
            "Delete"
        ),
    )
}

fn board_view(store: Store<Board>) -> impl Fn(&Board) -> VNode {
    move |board: &Board| {
        let draft_input = {
            let store = store.clone();
            on(move |event: &Event| {
                let value = event.value.clone().unwrap_or_default();
                store.set(|board| board.draft = value);
            })
        };
        let cards: Vec<VNode> = board
            .posts
            .iter()
            .map(|post| post_card(&store, post, &board.draft))
            .collect();
        h!(
            "div",
            props! { "className" => "board" },
            h!("h1", None, "Board"),
            h!(
                "input",
                props! {
                    "placeholder" => "Write a comment",
                    "data-action" => "draft",
                    "value" => board.draft.as_str(),
                    "onInput" => draft_input,
                }
            ),
            h!("section", props! { "className" => "feed" }, cards),
            h!("footer", None, board.posts.len(), " posts"),
        )
    }
}

fn click(
    shell: &mut AppShell<MemoryHost, Board>,
    container: NodeId,
    action: &str,
) -> Result<(), Box<dyn Error>> {
    let target = shell
        .host()
        .find_by_attribute(container, "data-action", action)
        .ok_or_else(|| format!("no element with data-action `{action}`"))?;
    let handled = shell.host().dispatch(&Event::new("click", target))?;
    log::info!("click on `{action}` reached {handled} handler(s)");
    shell.update()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut host = MemoryHost::new();
    let container = host.create_element("main")?;
    let store = Store::new(Board::seeded());
    let mut shell = AppShell::new(host, container, store.clone(), board_view(store))?;

    println!("== initial ==\n{}\n", shell.host().to_html(container));

    click(&mut shell, container, "like-2")?;

    let draft = shell
        .host()
        .find_by_attribute(container, "data-action", "draft")
        .ok_or("draft input missing")?;
    shell.host_mut().type_into(draft, "Great write-up")?;
    shell.update()?;
    click(&mut shell, container, "comment-2")?;

    click(&mut shell, container, "delete-1")?;

    println!("== after interactions ==\n{}\n", shell.host().to_html(container));
    println!("{}", shell.host().dump_tree(Some(container)));
    log::info!("{} renders committed", shell.render_count());
    Ok(())
}
