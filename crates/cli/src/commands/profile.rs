//! Profile commands.

use clap::Args;
use tracing::info;

use famigo_core::{Email, GeoPoint, HomeLocation, UserProfile};

use super::Store;

/// Fields for `profile set`. The profile is replaced wholesale; unset
/// optional flags clear the corresponding field.
#[derive(Args)]
pub struct ProfileFields {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Home city
    #[arg(long)]
    pub city: String,

    /// Home latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Home longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Contact email
    #[arg(short, long)]
    pub email: Option<String>,

    /// Short bio
    #[arg(short, long)]
    pub bio: Option<String>,

    /// Kids' ages in years, comma-separated (e.g. `3,7`)
    #[arg(long, value_delimiter = ',')]
    pub kids_ages: Vec<u8>,
}

/// Print the current profile, or a hint if none exists.
pub fn show(store: &Store) {
    match store.profile() {
        Some(profile) => {
            println!("Name:      {}", profile.name);
            println!("City:      {}", profile.home_location.city);
            if let Some(email) = &profile.email {
                println!("Email:     {email}");
            }
            if let Some(bio) = &profile.bio {
                println!("Bio:       {bio}");
            }
            if !profile.kids_ages.is_empty() {
                let ages: Vec<String> = profile.kids_ages.iter().map(u8::to_string).collect();
                println!("Kids ages: {}", ages.join(", "));
            }
            println!("Updated:   {}", profile.updated_at.format("%Y-%m-%d %H:%M"));
        }
        None => println!("No profile. Run `famigo profile set` to create one."),
    }
}

/// Create or replace the profile.
pub async fn set(store: &Store, fields: ProfileFields) -> Result<(), Box<dyn std::error::Error>> {
    let home = HomeLocation::new(fields.city, GeoPoint::new(fields.lat, fields.lng));

    // Keep the existing ID when re-saving so favorites stay attributed
    // to the same user.
    let mut profile = match store.profile() {
        Some(existing) => {
            let mut profile = existing;
            profile.name = fields.name;
            profile.home_location = home;
            profile.updated_at = chrono::Utc::now();
            profile
        }
        None => UserProfile::new(fields.name, home)?,
    };

    profile.email = fields.email.as_deref().map(Email::parse).transpose()?;
    profile.bio = fields.bio;
    profile.kids_ages = fields.kids_ages;

    store.set_profile(profile).await?;
    info!("Profile saved");
    Ok(())
}

/// Clear the profile. Favorites survive for the next login.
pub async fn clear(store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    store.clear_profile().await?;
    info!("Profile cleared (favorites kept)");
    Ok(())
}
