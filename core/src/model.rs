//! Typed attribute sets for the built-in entity kinds.
//!
//! Each struct deserializes from a node's `properties` object. Every
//! attribute is optional; relationship slots are skipped by serde and filled
//! afterwards by the resolver from the node's `relationships` object.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::entity::{Model, Relationship};

/// Construction hooks the registry needs for a built-in kind.
pub trait Construct: Model + DeserializeOwned + Send + Sync + 'static {
    /// `(relationship name, target kind tag)` pairs.
    const RELATIONSHIPS: &'static [(&'static str, &'static str)];

    fn attach(&mut self, name: &str, relationship: Relationship);
}

macro_rules! model {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $field:ident: $ty:ty, )*
        }
        relationships {
            $( $rel:ident => $target:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub uuid: Option<Uuid>,
            $( pub $field: Option<$ty>, )*
            $(
                #[serde(skip)]
                pub $rel: Option<Relationship>,
            )*
        }

        impl Model for $name {
            fn uuid(&self) -> Option<Uuid> {
                self.uuid
            }

            fn relationship(&self, name: &str) -> Option<&Relationship> {
                match name {
                    $( stringify!($rel) => self.$rel.as_ref(), )*
                    _ => None,
                }
            }

            fn relationship_names(&self) -> Vec<&str> {
                #[allow(unused_mut)]
                let mut names = Vec::new();
                $(
                    if self.$rel.is_some() {
                        names.push(stringify!($rel));
                    }
                )*
                names
            }
        }

        impl Construct for $name {
            const RELATIONSHIPS: &'static [(&'static str, &'static str)] =
                &[ $( (stringify!($rel), $target), )* ];

            #[allow(unused_variables)]
            fn attach(&mut self, name: &str, relationship: Relationship) {
                match name {
                    $( stringify!($rel) => self.$rel = Some(relationship), )*
                    _ => {}
                }
            }
        }
    };
}

model! {
    /// An organization summary or full organization record.
    pub struct Organization {
        permalink: String,
        api_path: String,
        web_path: String,
        name: String,
        short_description: String,
        description: String,
        primary_role: String,
        role_company: bool,
        role_investor: bool,
        role_group: bool,
        role_school: bool,
        founded_on: String,
        founded_on_trust_code: i64,
        is_closed: bool,
        closed_on: String,
        num_employees_min: i64,
        num_employees_max: i64,
        total_funding_usd: f64,
        number_of_investments: i64,
        stock_exchange: String,
        stock_symbol: String,
        homepage_url: String,
        domain: String,
        profile_image_url: String,
        facebook_url: String,
        twitter_url: String,
        linkedin_url: String,
        city_name: String,
        region_name: String,
        country_code: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        founders => "people",
        current_team => "current_team",
        past_team => "past_team",
        board_members_and_advisors => "board_members_and_advisors",
        funding_rounds => "funding_rounds",
        investments => "investments",
        acquisitions => "acquisitions",
        acquired_by => "acquisitions",
        ipo => "ipos",
        products => "products",
        offices => "offices",
        headquarters => "headquarters",
        categories => "categories",
        customers => "customers",
        videos => "videos",
    }
}

model! {
    pub struct Person {
        permalink: String,
        api_path: String,
        web_path: String,
        first_name: String,
        last_name: String,
        bio: String,
        profile_image_url: String,
        role_investor: bool,
        born_on: String,
        born_on_trust_code: i64,
        died_on: String,
        gender: String,
        homepage_url: String,
        facebook_url: String,
        twitter_url: String,
        linkedin_url: String,
        city_name: String,
        region_name: String,
        country_code: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        primary_affiliation => "primary_affiliation",
        primary_location => "primary_location",
        advisor_at => "advisor_at",
        founded_companies => "founded_companies",
        degrees => "degrees",
        investments => "investments",
        videos => "videos",
    }
}

impl Person {
    /// `first_name last_name`, skipping whichever is absent.
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(one), None) | (None, Some(one)) => Some(one.clone()),
            (None, None) => None,
        }
    }
}

model! {
    pub struct Product {
        permalink: String,
        api_path: String,
        web_path: String,
        name: String,
        lifecycle_stage: String,
        short_description: String,
        description: String,
        homepage_url: String,
        launched_on: String,
        closed_on: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        owner => "organizations",
        categories => "categories",
    }
}

model! {
    pub struct Category {
        web_path: String,
        name: String,
        organizations_in_category: i64,
        products_in_category: i64,
        created_at: i64,
        updated_at: i64,
    }
    relationships {}
}

model! {
    pub struct FundingRound {
        permalink: String,
        api_path: String,
        web_path: String,
        funding_type: String,
        series: String,
        announced_on: String,
        closed_on: String,
        money_raised: f64,
        money_raised_currency_code: String,
        money_raised_usd: f64,
        target_money_raised_usd: f64,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        funded_organization => "organizations",
        investments => "investments",
    }
}

model! {
    pub struct Acquisition {
        api_path: String,
        web_path: String,
        price: f64,
        price_currency_code: String,
        price_usd: f64,
        payment_type: String,
        acquisition_type: String,
        acquisition_status: String,
        disposition_of_acquired: String,
        announced_on: String,
        completed_on: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        acquirer => "organizations",
        acquiree => "organizations",
    }
}

model! {
    pub struct Ipo {
        api_path: String,
        web_path: String,
        went_public_on: String,
        stock_exchange_symbol: String,
        stock_symbol: String,
        shares_sold: i64,
        opening_share_price: f64,
        opening_valuation_usd: f64,
        money_raised_usd: f64,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        funded_company => "organizations",
    }
}

model! {
    pub struct Investment {
        api_path: String,
        web_path: String,
        money_invested: f64,
        money_invested_currency_code: String,
        money_invested_usd: f64,
        is_lead_investor: bool,
        announced_on: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        funding_round => "funding_rounds",
        invested_in => "organizations",
    }
}

model! {
    /// A postal location; also used for a person's primary location and an
    /// organization's headquarters.
    pub struct Location {
        name: String,
        street_1: String,
        street_2: String,
        postal_code: String,
        city: String,
        city_web_path: String,
        region: String,
        region_web_path: String,
        country: String,
        country_web_path: String,
        latitude: f64,
        longitude: f64,
        location_type: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {}
}

model! {
    pub struct Office {
        name: String,
        street_1: String,
        street_2: String,
        postal_code: String,
        city: String,
        region: String,
        country: String,
        latitude: f64,
        longitude: f64,
        created_at: i64,
        updated_at: i64,
    }
    relationships {}
}

model! {
    pub struct Customer {
        permalink: String,
        api_path: String,
        web_path: String,
        name: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {}
}

model! {
    pub struct Degree {
        degree_type_name: String,
        degree_subject: String,
        started_on: String,
        completed_on: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        school => "organizations",
        person => "people",
    }
}

model! {
    pub struct Video {
        title: String,
        service_name: String,
        url: String,
        created_at: i64,
        updated_at: i64,
    }
    relationships {}
}

model! {
    /// A role linking a person and an organization: current or past team
    /// member, board member or advisor, primary affiliation, advisory role.
    pub struct Job {
        title: String,
        job_type: String,
        started_on: String,
        started_on_trust_code: i64,
        ended_on: String,
        ended_on_trust_code: i64,
        is_current: bool,
        created_at: i64,
        updated_at: i64,
    }
    relationships {
        person => "people",
        organization => "organizations",
    }
}
