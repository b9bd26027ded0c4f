use std::env;

use algowiki::{
    client::ApiClient,
    config::Config,
    error::Result,
    model::{CreateTopicRequest, Topic},
};
use serde::Serialize;

const USAGE: &str = "\
Usage: algowiki-admin <command> [args]

Commands:
  tree                          print the topic tree
  get <slug>                    print a topic by slug
  search <keyword>              search topics
  create-topic <json-file>      create a topic from a JSON request body
  update-topic <id> <json-file> replace a topic
  delete-topic <id>             delete a topic
  tags                          list tags
  create-tag <name> [color]     create a tag
  delete-tag <id>               delete a tag";

fn print_usage_and_exit() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(1);
}

fn next_arg(
    args: &mut impl Iterator<Item = String>,
    name: &str,
) -> std::result::Result<String, String> {
    args.next().ok_or_else(|| format!("Missing <{name}>"))
}

fn parse_id(value: &str) -> std::result::Result<i64, String> {
    value.parse().map_err(|_| format!("Invalid id: {value}"))
}

/// 已解析的子命令
#[derive(Debug, PartialEq)]
enum Command {
    Tree,
    Get(String),
    Search(String),
    CreateTopic(String),
    UpdateTopic(i64, String),
    DeleteTopic(i64),
    Tags,
    CreateTag(String, Option<String>),
    DeleteTag(i64),
}

/// 解析全部参数，多余的参数在发送任何请求之前被拒绝
fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> std::result::Result<Command, String> {
    let command = next_arg(&mut args, "command")?;

    let command = match command.as_str() {
        "tree" => Command::Tree,
        "get" => Command::Get(next_arg(&mut args, "slug")?),
        "search" => Command::Search(next_arg(&mut args, "keyword")?),
        "create-topic" => Command::CreateTopic(next_arg(&mut args, "json-file")?),
        "update-topic" => {
            let id = parse_id(&next_arg(&mut args, "id")?)?;
            Command::UpdateTopic(id, next_arg(&mut args, "json-file")?)
        }
        "delete-topic" => Command::DeleteTopic(parse_id(&next_arg(&mut args, "id")?)?),
        "tags" => Command::Tags,
        "create-tag" => Command::CreateTag(next_arg(&mut args, "name")?, args.next()),
        "delete-tag" => Command::DeleteTag(parse_id(&next_arg(&mut args, "id")?)?),
        other => return Err(format!("Unknown command: {other}")),
    };

    if args.next().is_some() {
        return Err("Too many arguments provided.".to_string());
    }

    Ok(command)
}

fn read_request(file: &str) -> Result<CreateTopicRequest> {
    let content = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_tree(topics: &[Topic], depth: usize) {
    for topic in topics {
        println!("{}{} ({})", "  ".repeat(depth), topic.title, topic.slug);
        if topic.has_children() {
            print_tree(&topic.children, depth + 1);
        }
    }
}

async fn execute(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Tree => print_tree(&client.topic_tree().await?, 0),
        Command::Get(slug) => print_json(&client.topic_by_slug(&slug).await?)?,
        Command::Search(keyword) => {
            for topic in client.search_topics(&keyword).await? {
                println!("{}\t{}", topic.slug, topic.title);
            }
        }
        Command::CreateTopic(file) => {
            let request = read_request(&file)?;
            print_json(&client.create_topic(&request).await?)?
        }
        Command::UpdateTopic(id, file) => {
            let request = read_request(&file)?;
            print_json(&client.update_topic(id, &request).await?)?
        }
        Command::DeleteTopic(id) => client.delete_topic(id).await?,
        Command::Tags => {
            for tag in client.all_tags().await? {
                println!("{}\t{}\t{}", tag.id, tag.name, tag.color());
            }
        }
        Command::CreateTag(name, color) => {
            print_json(&client.create_tag(&name, color.as_deref()).await?)?
        }
        Command::DeleteTag(id) => client.delete_tag(id).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // 跳过程序名
    let command = parse_args(env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("{e}");
        print_usage_and_exit();
    });

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("❌ Failed to load configuration: {e}");
        std::process::exit(1);
    });
    let client = ApiClient::new(&config.api_url).unwrap_or_else(|e| {
        eprintln!("❌ Failed to create api client: {e}");
        std::process::exit(1);
    });

    if let Err(e) = execute(&client, command).await {
        match &e {
            algowiki::error::Error::Api(api) => match &api.payload {
                Some(payload) => eprintln!("❌ {} | {}", api.status, payload.message),
                None => eprintln!("❌ {}", api.status),
            },
            _ => eprintln!("❌ {e}"),
        }
        std::process::exit(1);
    }
}
