/// Ids of the 77 districts, as used for the shapes in the map SVG.
pub const DISTRICTS: [&str; 77] = [
    "achham",
    "arghakhanchi",
    "baglung",
    "baitadi",
    "bajhang",
    "bajura",
    "banke",
    "bara",
    "bardiya",
    "bhaktapur",
    "bhojpur",
    "chitwan",
    "dadeldhura",
    "dailekh",
    "dang",
    "darchula",
    "dhading",
    "dhankuta",
    "dhanusa",
    "dolakha",
    "dolpa",
    "doti",
    "eastern-rukum",
    "gorkha",
    "gulmi",
    "humla",
    "ilam",
    "jajarkot",
    "jhapa",
    "jumla",
    "kailali",
    "kalikot",
    "kanchanpur",
    "kapilvastu",
    "kaski",
    "kathmandu",
    "kavrepalanchok",
    "khotang",
    "lalitpur",
    "lamjung",
    "mahottari",
    "makwanpur",
    "manang",
    "morang",
    "mugu",
    "mustang",
    "myagdi",
    "nawalparasi-east",
    "nawalparasi-west",
    "nuwakot",
    "okhaldhunga",
    "palpa",
    "panchthar",
    "parbat",
    "parsa",
    "pyuthan",
    "ramechhap",
    "rasuwa",
    "rautahat",
    "rolpa",
    "rupandehi",
    "salyan",
    "sankhuwasabha",
    "saptari",
    "sarlahi",
    "sindhuli",
    "sindhupalchok",
    "siraha",
    "solukhumbu",
    "sunsari",
    "surkhet",
    "syangja",
    "tanahu",
    "taplejung",
    "terhathum",
    "udayapur",
    "western-rukum",
];

/// Normalize a caller-supplied district name to catalog form.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn is_district(id: &str) -> bool {
    DISTRICTS.contains(&id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_has_no_duplicates() {
        let unique: HashSet<_> = DISTRICTS.iter().collect();
        assert_eq!(unique.len(), DISTRICTS.len());
    }

    #[test]
    fn catalog_ids_are_normalized() {
        for id in DISTRICTS {
            assert_eq!(normalize(id), id);
        }
    }

    #[test]
    fn lookup_after_normalizing() {
        assert!(is_district(&normalize(" Kathmandu ")));
        assert!(!is_district(&normalize("Atlantis")));
    }
}
