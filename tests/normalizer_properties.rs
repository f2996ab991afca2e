use devrank::normalize;
use devrank::profile::{
    ContributionDay, ContributionWeek, Language, PinnedRepository, RawCalendar, RawContributions,
    RawDay, RawLanguage, RawNodes, RawPinnedRepository, RawProfile, RawRepositories,
    RawRepositoryStars, RawWeek,
};
use proptest::prelude::*;

fn pinned_repository() -> impl Strategy<Value = RawPinnedRepository> {
    (
        "[a-z][a-z0-9-]{0,15}",
        proptest::option::of("[A-Za-z ]{0,30}"),
        0i64..200_000,
        0i64..50_000,
        proptest::option::of(("[A-Z][a-z+#]{0,9}", "#[0-9a-f]{6}")),
    )
        .prop_map(|(name, description, stars, forks, language)| RawPinnedRepository {
            url: Some(format!("https://github.com/octocat/{}", name)),
            name: Some(name),
            description,
            stargazer_count: Some(stars),
            fork_count: Some(forks),
            primary_language: language.map(|(name, color)| RawLanguage {
                name: Some(name),
                color: Some(color),
            }),
        })
}

fn contribution_day() -> impl Strategy<Value = RawDay> {
    ("#[0-9a-f]{6}", 0i64..500, 1u32..=12, 1u32..=28).prop_map(|(color, count, month, day)| {
        RawDay {
            color: Some(color),
            contribution_count: Some(count),
            date: Some(format!("2026-{:02}-{:02}", month, day)),
        }
    })
}

fn calendar_weeks() -> impl Strategy<Value = Vec<RawWeek>> {
    prop::collection::vec(
        prop::collection::vec(contribution_day(), 0..=7).prop_map(|days| RawWeek {
            contribution_days: Some(days),
        }),
        0..=53,
    )
}

fn raw_profile(
    pinned: Vec<RawPinnedRepository>,
    weeks: Vec<RawWeek>,
    stars: &[i64],
) -> RawProfile {
    RawProfile {
        login: Some("octocat".to_string()),
        contributions_collection: Some(RawContributions {
            contribution_calendar: Some(RawCalendar {
                total_contributions: Some(0),
                weeks: Some(weeks),
            }),
            ..Default::default()
        }),
        pinned_items: Some(RawNodes {
            nodes: Some(pinned),
        }),
        repositories: Some(RawRepositories {
            total_count: Some(stars.len() as i64),
            nodes: Some(
                stars
                    .iter()
                    .map(|&count| RawRepositoryStars {
                        stargazer_count: Some(count),
                    })
                    .collect(),
            ),
        }),
        ..Default::default()
    }
}

fn expected_pinned(raw: &RawPinnedRepository) -> PinnedRepository {
    let language = raw.primary_language.clone().unwrap_or_default();
    PinnedRepository {
        name: raw.name.clone().unwrap_or_default(),
        description: raw.description.clone().unwrap_or_default(),
        stargazer_count: raw.stargazer_count.unwrap_or(0) as u64,
        fork_count: raw.fork_count.unwrap_or(0) as u64,
        primary_language: Language {
            name: language.name.unwrap_or_default(),
            color: language.color.unwrap_or_default(),
        },
        url: raw.url.clone().unwrap_or_default(),
    }
}

fn expected_week(raw: &RawWeek) -> ContributionWeek {
    ContributionWeek {
        contribution_days: raw
            .contribution_days
            .iter()
            .flatten()
            .map(|day| ContributionDay {
                color: day.color.clone().unwrap_or_default(),
                contribution_count: day.contribution_count.unwrap_or(0) as u64,
                date: day.date.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

proptest! {
    #[test]
    fn test_pinned_and_calendar_preserved_in_order(
        pinned in prop::collection::vec(pinned_repository(), 0..=6),
        weeks in calendar_weeks(),
    ) {
        let stats = normalize(raw_profile(pinned.clone(), weeks.clone(), &[])).unwrap();

        let expected: Vec<PinnedRepository> = pinned.iter().map(expected_pinned).collect();
        prop_assert_eq!(&stats.pinned_repositories, &expected);

        let expected: Vec<ContributionWeek> = weeks.iter().map(expected_week).collect();
        prop_assert_eq!(&stats.contribution_calendar.weeks, &expected);
    }

    #[test]
    fn test_stars_earned_is_sum_of_returned_repositories(
        stars in prop::collection::vec(0i64..1_000_000, 0..=100),
    ) {
        let stats = normalize(raw_profile(Vec::new(), Vec::new(), &stars)).unwrap();
        let total: u64 = stars.iter().map(|&s| s as u64).sum();
        prop_assert_eq!(stats.total_stars_earned, total);
        prop_assert_eq!(stats.total_public_repositories, stars.len() as u64);
    }
}

#[test]
fn test_six_pinned_repositories_kept() {
    let pinned: Vec<RawPinnedRepository> = (0..6)
        .map(|i| RawPinnedRepository {
            name: Some(format!("repo-{}", i)),
            stargazer_count: Some(i * 10),
            ..Default::default()
        })
        .collect();

    let stats = normalize(raw_profile(pinned, Vec::new(), &[])).unwrap();
    let names: Vec<&str> = stats
        .pinned_repositories
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(
        names,
        ["repo-0", "repo-1", "repo-2", "repo-3", "repo-4", "repo-5"]
    );
    assert_eq!(stats.pinned_repositories[5].stargazer_count, 50);
}
