//! The 8by8 Challenge homepage checklist.
//!
//! Every check is a literal: titles, texts, hashed CSS module class names and
//! asset URLs as the production build emits them.

use crate::config::SuiteConfig;
use crate::expectation::{expect, expect_title};
use crate::harness::{TestCase, TestSuite};
use crate::locator::{Locator, Query};

/// Suite name
pub const SUITE_NAME: &str = "homepage";

/// Document title
pub const TITLE: &str = "8by8 Challenge";

/// Main heading, compared ignoring case
pub const HEADLINE: &str = "GET 8 AAPI FRIENDS TO REGISTER TO VOTE IN 8 DAYS";

/// Call to action text, compared ignoring case
pub const CHALLENGE_TEXT: &str = "TAKE THE CHALLENGE";

/// Class of the hero challenge button
pub const CHALLENGE_BUTTON_CLASS: &str = "styles_challenge_btn__T0eGB";

/// Class of the hamburger menu checkbox
pub const MENU_TOGGLE_CLASS: &str = "hidden";

/// Class of the element that opens the hamburger menu
pub const MENU_OUTER_CLASS: &str = "styles_outer_container__ppLtJ";

/// Class of the opened hamburger menu
pub const MENU_INNER_CLASS: &str = "styles_inner_container__0JSHj";

/// Class of the hamburger menu item list
pub const MENU_ITEMS_CLASS: &str = "styles_hamburger_menu_items__8yFBG";

/// Hamburger menu greeting, compared ignoring case
pub const MENU_GREETING: &str = "Hi there!";

/// Hamburger menu items in order, compared ignoring case
pub const MENU_ITEMS: [&str; 8] = [
    "",
    "Take the challenge",
    "Take action",
    "Why 8by8",
    "Terms of Service",
    "Privacy Policy",
    "Sign up",
    "Sign in",
];

/// Classes of the seven page sections, by zero-based index
pub const SECTION_CLASSES: [&str; 7] = [
    "styles_section_1__MMFLM",
    "styles_section_2__wgjjP",
    "styles_section_3__AiNEH",
    "styles_section_4__h94nS",
    "styles_section_5__e7b2k",
    "styles_section_6__4DbyJ",
    "styles_section_7__z9IJU",
];

/// Visible text of the third section
pub const SECTION_3_TEXT: &str = "In 2020, we saw an unprecedented 150% spike in anti-AAPI \
    (Asian American Pacific Islander) hate crimes, a trend that is already continuing into \
    2021. This is both a national and a local problem.";

/// Visible text of the fourth section
pub const SECTION_4_TEXT: &str = "150% spike in anti-Asian and anti-AAPI hate crimes in 2020";

/// Visible text of the fifth section
pub const SECTION_5_TEXT: &str = "We need\nmore aapi\nvoters";

/// Third `h2` on the page
pub const REPRESENTATION_GAP_TEXT: &str = "the path to fixing this problem starts with closing \
    the representation gap In Asian-American communities.";

/// Fourth `h2` on the page
pub const CALL_TO_JOIN_TEXT: &str = "we're asking everyone to join us in taking the \
    #8by8challenge and registering 8 of their friends to vote in 8 days.";

/// Leading `h3` texts, in order
pub const STAT_HEADINGS: [&str; 5] = [
    "Asian American voter turnout rate has remained Below",
    "Asian-Americans make up",
    "of the population",
    "but only",
    "of Congress is Asian or AAPI",
];

/// Stat containers and the percentage each shows
pub const STAT_PERCENTAGES: [(&str, &str); 3] = [
    ("styles_stat_percentage_container_1__E4Hep", "60%"),
    ("styles_stat_percentage_container_2__yCM_4", "7%"),
    ("styles_stat_percentage_container_3__sUpCi", "3%"),
];

/// Selector of the bottom call to action
pub const CTA_SELECTOR: &str = ".btn_gradient.btn_wide.btn_lg";

/// Exact class of the mission paragraph
pub const MISSION_CLASS: &str = "b2 color_white";

/// Mission paragraph text
pub const MISSION_TEXT: &str = "The 8by8 mission aims to build civic participation and bring \
    awareness to the struggles of AAPI citizens, while encouraging community involvement and \
    investment. Our approach involves working with community, business, and tech leaders to \
    create voter registration solutions that work.";

/// Images by `alt` text and their asset path relative to the base URL
pub const IMAGES: [(&str, &str, &str); 9] = [
    (
        "logo_render",
        "8by8 Logo",
        "/_next/static/media/8by8-logo.a39d7aad.svg",
    ),
    (
        "yellow_curve_image",
        "yellow curve",
        "/_next/static/media/yellow-curve.0236528a.svg",
    ),
    (
        "speech_bubble_1_image",
        "why 8by8?",
        "/_next/image?url=%2F_next%2Fstatic%2Fmedia%2Fspeech-bubble-1.a1a22d7f.png&w=640&q=75",
    ),
    (
        "father_and_daughter_image",
        "sign",
        "/_next/image?url=%2F_next%2Fstatic%2Fmedia%2Ffather-and-daughter-with-sign.1f060e65.png&w=750&q=75",
    ),
    (
        "teal_curve_image",
        "teal curve",
        "/_next/static/media/teal-curve.8a426c54.svg",
    ),
    (
        "speech_bubble_2_image",
        "solution?",
        "/_next/image?url=%2F_next%2Fstatic%2Fmedia%2Fspeech-bubble-2.06da5b3c.png&w=640&q=75",
    ),
    (
        "speaker_with_mic_image",
        "mic",
        "/_next/image?url=%2F_next%2Fstatic%2Fmedia%2Fspeaker-with-mic-and-sign.e7d8ad09.png&w=640&q=75",
    ),
    (
        "black_curve_image",
        "black curve",
        "/_next/static/media/black-curve.49e02ce0.svg",
    ),
    (
        "speech_bubble_3_image",
        "we need your help!",
        "/_next/image?url=%2F_next%2Fstatic%2Fmedia%2Fspeech-bubble-3.3f2f3c8a.png&w=640&q=75",
    ),
];

fn section(index: usize) -> Query {
    Query::nth(Locator::tag("section"), index)
}

fn section_class(index: usize) -> TestCase {
    TestCase::new(
        format!("section_{}_render", index + 1),
        format!("section {} carries its class", index + 1),
    )
    .expect(
        expect(section(index))
            .attribute("class")
            .equals(SECTION_CLASSES[index]),
    )
}

fn image(config: &SuiteConfig, (name, alt, path): (&str, &str, &str)) -> TestCase {
    TestCase::new(name, format!("image `{alt}` points at its asset")).expect(
        expect(Query::first(Locator::xpath(format!("//img[@alt='{alt}']"))))
            .attribute("src")
            .equals(config.asset_url(path)),
    )
}

/// Build the homepage suite; asset URLs derive from the configured base URL
#[must_use]
pub fn homepage_suite(config: &SuiteConfig) -> TestSuite {
    let menu_items = Query::first(Locator::class_name(MENU_ITEMS_CLASS));

    let mut suite = TestSuite::new(SUITE_NAME)
        .with_test(
            TestCase::new("homepage_title", "document title").expect(expect_title().equals(TITLE)),
        )
        .with_test(image(config, IMAGES[0]))
        .with_test(
            TestCase::new("h1_exists", "main heading is displayed")
                .expect(expect(Query::first(Locator::tag("h1"))).displayed())
                .expect(
                    expect(Query::first(Locator::tag("h1")))
                        .text()
                        .equals_ignore_case(HEADLINE),
                ),
        )
        .with_test(
            TestCase::new("challenge_button", "hero challenge button text").expect(
                expect(Query::first(Locator::css(format!(".{CHALLENGE_BUTTON_CLASS}"))))
                    .text()
                    .equals_ignore_case(CHALLENGE_TEXT),
            ),
        )
        .with_test(
            TestCase::new("hamburger_menu", "hamburger menu opens")
                .expect(
                    expect(Query::first(Locator::class_name(MENU_TOGGLE_CLASS)))
                        .not_selected()
                        .or_fail("Hamburger Menu Tests have failed!"),
                )
                .hover_click(Query::first(Locator::class_name(MENU_OUTER_CLASS)))
                .expect(
                    expect(Query::first(Locator::class_name(MENU_INNER_CLASS)))
                        .displayed()
                        .or_fail("Inner Menu is not displayed!"),
                ),
        )
        .with_test(
            TestCase::new("hamburger_menu_items", "hamburger menu greeting and items")
                .expect(
                    expect(Query::first(Locator::tag("h2")).within(menu_items.clone()))
                        .property("innerText")
                        .equals_ignore_case(MENU_GREETING),
                )
                .expect(
                    expect(Query::all(Locator::tag("li")).within(menu_items))
                        .property("innerText")
                        .sequence_ignore_case(MENU_ITEMS),
                ),
        )
        .with_test(section_class(0))
        .with_test(
            TestCase::new("link_tag", "`See` link points at /why8by8").expect(
                expect(Query::first(Locator::partial_link_text("See")))
                    .attribute("href")
                    .contains("/why8by8"),
            ),
        )
        .with_test(image(config, IMAGES[1]))
        .with_test(section_class(1))
        .with_test(image(config, IMAGES[2]))
        .with_test(image(config, IMAGES[3]))
        .with_test(
            section_class(2)
                .expect(expect(section(2)).text().equals(SECTION_3_TEXT)),
        )
        .with_test(image(config, IMAGES[4]))
        .with_test(
            TestCase::new("section_4_render", "section 4 class and text")
                .expect(
                    expect(section(3))
                        .attribute("class")
                        .equals(SECTION_CLASSES[3])
                        .or_fail(format!(
                            "Expected class '{}', but got '{{actual}}'",
                            SECTION_CLASSES[3]
                        )),
                )
                .expect(expect(section(3)).text().equals(SECTION_4_TEXT)),
        )
        .with_test(
            section_class(4)
                .expect(expect(section(4)).text().equals(SECTION_5_TEXT)),
        )
        .with_test(image(config, IMAGES[5]))
        .with_test(image(config, IMAGES[6]))
        .with_test(section_class(5))
        .with_test(
            TestCase::new("target_text_tags", "representation gap heading and stat headings")
                .expect(
                    expect(Query::nth(Locator::tag("h2"), 2))
                        .text()
                        .equals(REPRESENTATION_GAP_TEXT),
                )
                .expect(
                    expect(Query::all(Locator::tag("h3")))
                        .text()
                        .starts_with_sequence(STAT_HEADINGS),
                ),
        );

    let mut stats = TestCase::new("stat_percentages", "stat containers show their percentage");
    for (class, percentage) in STAT_PERCENTAGES {
        stats = stats.expect(
            expect(Query::each(Locator::css(format!("div[class='{class}']"))))
                .text()
                .equals(percentage),
        );
    }
    suite.add_test(stats);

    suite
        .with_test(image(config, IMAGES[7]))
        .with_test(section_class(6))
        .with_test(image(config, IMAGES[8]))
        .with_test(
            TestCase::new("h2_content", "call to join heading").expect(
                expect(Query::nth(Locator::tag("h2"), 3))
                    .text()
                    .equals(CALL_TO_JOIN_TEXT),
            ),
        )
        .with_test(
            TestCase::new("button_action", "bottom call to action is clickable")
                .expect(
                    expect(Query::first(Locator::css(CTA_SELECTOR)))
                        .text()
                        .equals_ignore_case(CHALLENGE_TEXT)
                        .or_fail("expected texted TAKE THE CHALLENGE but got {actual}"),
                )
                .click(Query::first(Locator::css(CTA_SELECTOR))),
        )
        .with_test(
            TestCase::new("mission_paragraph", "mission paragraph text").expect(
                expect(Query::first(Locator::css(format!("p[class='{MISSION_CLASS}']"))))
                    .text()
                    .equals(MISSION_TEXT)
                    .or_missing(format!(
                        "Expected paragraph with class '{MISSION_CLASS}' was not found."
                    )),
            ),
        )
}
