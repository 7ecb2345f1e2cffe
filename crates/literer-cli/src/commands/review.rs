use anyhow::Result;
use literer_config::Config;
use literer_engine::{LiteratureReview, ReviewRequest, Reviewer};
use literer_scholar::{PaperSearch, SearchQuery, create_bibliography};

use super::{check_model_available, emit, model_context, openai_client, scholar_client};
use crate::cli::{PapersArgs, ReviewArgs};

async fn reviewer(config: &Config, model_override: bool) -> Result<Reviewer> {
    let context = model_context(config)?;
    let client = openai_client(config)?;
    if model_override {
        check_model_available(&client, &config.model).await?;
    }
    Ok(Reviewer::new(client, context).with_concurrency(config.concurrency))
}

pub async fn keywords(
    config: &Config,
    model_override: bool,
    topic: String,
    count: usize,
) -> Result<()> {
    let reviewer = reviewer(config, model_override).await?;
    for keyword in reviewer.keywords(&topic, count).await? {
        println!("{}", keyword);
    }
    Ok(())
}

pub async fn papers(config: &Config, args: PapersArgs) -> Result<()> {
    let client = scholar_client(config)?;

    let query = SearchQuery::new(args.keyword)
        .limit(args.limit.unwrap_or(config.scholar.max_results))
        .years(args.year_start, args.year_end)
        .venues(args.venues)
        .fields_of_study(args.fields)?
        .publication_types(args.types)?;

    let publications = client.search(&query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&publications)?);
    } else if publications.is_empty() {
        println!("No publications found.");
    } else {
        for (i, p) in publications.iter().enumerate() {
            println!("{}. {}", i + 1, p.title);
            if !p.authors.is_empty() {
                println!("   {}", p.authors.join(", "));
            }
            let year = p
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "n.d.".to_string());
            match p.venue.as_deref().filter(|v| !v.is_empty()) {
                Some(venue) => println!("   {} · {}", year, venue),
                None => println!("   {}", year),
            }
            if let Some(url) = &p.url {
                println!("   {}", url);
            }
        }
    }

    if let Some(path) = &args.bib {
        emit(&create_bibliography(&publications), Some(path.as_path()))?;
    }

    Ok(())
}

pub async fn review(config: &Config, model_override: bool, args: ReviewArgs) -> Result<()> {
    let pipeline = LiteratureReview::new(
        scholar_client(config)?,
        reviewer(config, model_override).await?,
    );

    let request = ReviewRequest {
        topic: args.topic,
        keywords: args.keywords,
        publications: args.publications.unwrap_or(config.scholar.max_results),
        tex_format: !args.no_tex,
    };

    eprintln!("Creating literature review (this might take a while) ...");
    let output = pipeline.run(&request).await?;

    eprintln!("Queries: {}", output.keywords.join(" | "));
    eprintln!("Publications reviewed: {}", output.publications.len());

    if let Some(path) = &args.bib {
        emit(&output.bibliography, Some(path.as_path()))?;
    }
    emit(&output.review, args.out.as_deref())
}
