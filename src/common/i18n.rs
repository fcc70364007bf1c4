// src/common/i18n.rs

// Textos que aparecem nos gráficos e nos rótulos das séries.
// O dashboard nasceu em espanhol; inglês é a alternativa via Accept-Language.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Es,
    En,
}

const MONTHS_ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Domingo primeiro (0 = domingo)
const WEEKDAYS_ES: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];
const WEEKDAYS_EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

impl Lang {
    /// "pt-BR" -> Es (fallback), "en-US" -> En, "es" -> Es.
    pub fn from_tag(tag: &str) -> Self {
        match tag.split('-').next().unwrap_or(tag) {
            "en" => Lang::En,
            _ => Lang::Es,
        }
    }

    pub fn month_short(self, month0: usize) -> &'static str {
        let table = match self {
            Lang::Es => &MONTHS_ES,
            Lang::En => &MONTHS_EN,
        };
        table[month0 % 12]
    }

    pub fn weekday_short(self, weekday0: usize) -> &'static str {
        let table = match self {
            Lang::Es => &WEEKDAYS_ES,
            Lang::En => &WEEKDAYS_EN,
        };
        table[weekday0 % 7]
    }

    pub fn others(self, folded: usize) -> String {
        match self {
            Lang::Es => format!("Otros ({folded})"),
            Lang::En => format!("Others ({folded})"),
        }
    }

    pub fn more_entries(self, hidden: usize) -> String {
        match self {
            Lang::Es => format!("+{hidden} más..."),
            Lang::En => format!("+{hidden} more..."),
        }
    }

    pub fn no_data(self) -> &'static str {
        match self {
            Lang::Es => "Sin datos",
            Lang::En => "No data",
        }
    }

    pub fn unnamed_client(self, id: &str) -> String {
        match self {
            Lang::Es => format!("Cliente {id}"),
            Lang::En => format!("Client {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_language_from_primary_subtag() {
        assert_eq!(Lang::from_tag("en-US"), Lang::En);
        assert_eq!(Lang::from_tag("es-CO"), Lang::Es);
        assert_eq!(Lang::from_tag("pt-BR"), Lang::Es);
    }

    #[test]
    fn fold_label_carries_the_folded_count() {
        assert_eq!(Lang::Es.others(2), "Otros (2)");
        assert_eq!(Lang::En.more_entries(3), "+3 more...");
    }
}
