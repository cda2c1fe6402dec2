//! Static marketing copy. Only insights come from the content store.

pub struct NavEntry {
    pub label: &'static str,
    pub href: &'static str,
}

pub const NAVIGATION: &[NavEntry] = &[
    NavEntry { label: "Home", href: "/" },
    NavEntry { label: "Services", href: "/services" },
    NavEntry { label: "Insights", href: "/insights" },
    NavEntry { label: "Who We Are", href: "/who-we-are" },
    NavEntry { label: "Contact", href: "/contact" },
];

pub struct Service {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub includes: &'static [&'static str],
}

pub const SERVICES: &[Service] = &[
    Service {
        slug: "fractional-cfo",
        title: "Fractional CFO",
        summary: "Senior finance leadership a few days a month, for companies that need a CFO's judgment before they need a full-time hire.",
        includes: &[
            "Board and investor reporting",
            "Cash runway and scenario planning",
            "Finance team hiring and oversight",
        ],
    },
    Service {
        slug: "fpa",
        title: "Financial Planning & Analysis",
        summary: "Operating models and budgets that leadership actually uses to make decisions.",
        includes: &[
            "Three-statement operating model",
            "Annual budget and monthly variance review",
            "Unit economics and pricing analysis",
        ],
    },
    Service {
        slug: "fundraising",
        title: "Fundraising Support",
        summary: "Preparation for equity and debt raises, from the first model to the closed round.",
        includes: &[
            "Investor-ready financial model",
            "Data room build and diligence management",
            "Term sheet review",
        ],
    },
    Service {
        slug: "accounting-operations",
        title: "Accounting Operations",
        summary: "A close process and controls that hold up to an audit.",
        includes: &[
            "Month-end close in five business days",
            "Revenue recognition policy",
            "Audit readiness",
        ],
    },
];

pub struct Home {
    pub headline: &'static str,
    pub lede: &'static str,
    pub call_to_action: &'static str,
}

pub static HOME: Home = Home {
    headline: "Strategic finance leadership, without the full-time cost",
    lede: "We partner with founders and operators to build the forecasting, reporting and controls a growing company needs.",
    call_to_action: "Talk to a CFO",
};

pub struct Principle {
    pub title: &'static str,
    pub body: &'static str,
}

pub struct About {
    pub intro: &'static [&'static str],
    pub principles: &'static [Principle],
}

pub static ABOUT: About = About {
    intro: &[
        "We are a team of former operating CFOs and controllers who have led finance at venture-backed startups and established mid-market businesses.",
        "Every engagement is led by a senior partner, and we keep our client roster small enough that each company gets real attention.",
    ],
    principles: &[
        Principle {
            title: "Decisions over decks",
            body: "Reporting exists to change what the business does next.",
        },
        Principle {
            title: "Cash is the constraint",
            body: "Every plan we build starts from the runway it leaves behind.",
        },
        Principle {
            title: "Build to hand off",
            body: "Models and processes are documented so your team can own them.",
        },
    ],
};

pub const CONTACT_EMAIL: &str = "hello@ledgerline.example";
